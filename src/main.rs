//! CLI tool for turning vCard files into business-card thumbnails or
//! single-contact `.vcf` files.

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;
use vcfthumb::{
    render_all, split_to_files, ReaderConfig, RecognizedParameterSet, Result, ThumbSize,
    ThumbnailRenderer, TracingSink, VcardReader,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Create a .png business card per contact
    Thumb,
    /// Write every contact to its own .vcf file
    Split,
}

#[derive(Debug, Parser)]
#[command(version, about = "Process .vcf files into thumbnails or single vCard files")]
struct Args {
    /// .vcf file with vCard data
    #[arg(long)]
    file: PathBuf,

    /// What to produce
    #[arg(long, value_enum, default_value_t = Mode::Thumb)]
    mode: Mode,

    /// Extra vCard parameter(s) to parse, space separated (defaults: N FN TITLE ORG ADR TEL EMAIL URL)
    #[arg(long, env = "VCFTHUMB_ADD")]
    add: Option<String>,

    /// .png image size in pixels: 350x200 or 700x400
    #[arg(long, default_value = "350x200", value_parser = parse_size)]
    size: ThumbSize,

    /// Output directory for the generated files
    #[arg(long, default_value = "vcfread_folder")]
    todir: PathBuf,

    /// TrueType/OpenType font for the thumbnail text (default: bundled DejaVu Sans)
    #[arg(long)]
    font: Option<PathBuf>,
}

fn parse_size(s: &str) -> std::result::Result<ThumbSize, String> {
    s.parse().map_err(|e: vcfthumb::VcardError| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vcfthumb=info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let parameters = match &args.add {
        Some(extra) => RecognizedParameterSet::default().with_extra(extra.split_whitespace())?,
        None => RecognizedParameterSet::default(),
    };

    let config = ReaderConfig {
        parameters,
        ..Default::default()
    };

    // Both the input and the output directory must be usable before any record is processed.
    let reader = VcardReader::with_config(&args.file, config)?;
    std::fs::create_dir_all(&args.todir)?;

    let stem = file_stem(&args.file);
    match args.mode {
        Mode::Thumb => {
            let cards = reader.read_cards(&mut TracingSink);
            let mut renderer = match &args.font {
                Some(path) => ThumbnailRenderer::with_font(args.size, std::fs::read(path)?)?,
                None => ThumbnailRenderer::new(args.size),
            };
            render_all(&mut renderer, &cards, &stem, &args.todir)?;
            println!(
                "thumbs files were placed into subdirectory: {}",
                args.todir.display()
            );
        }
        Mode::Split => {
            split_to_files(reader.text(), &stem, &args.todir)?;
            println!(
                "single vcard files were placed into subdirectory: {}",
                args.todir.display()
            );
        }
    }

    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "vcard".into())
}
