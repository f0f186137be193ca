//! Minimal CLI that lists the contacts of a .vcf file and saves their photos.
//!
//! Usage:
//!   cargo run --example read_cards -- contacts.vcf
//!   cargo run --example read_cards -- contacts.vcf ./photos

use std::{env, path::Path, process};
use vcfthumb::{Diagnostic, VcardReader};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <vcf_file> [photo_dir]", args[0]);
        process::exit(1);
    }

    let vcf_path = &args[1];
    let photo_dir = args.get(2).map(Path::new);

    let reader = VcardReader::from_path(vcf_path).unwrap_or_else(|e| {
        eprintln!("Error loading vCard file: {e}");
        process::exit(1);
    });

    println!("Analysing: {vcf_path} ({})", reader.encoding().name());

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let cards = reader.read_cards(&mut diagnostics);

    println!("✓ {} of {} vCard(s) usable", cards.len(), reader.count_records());
    for d in &diagnostics {
        println!("⚠ {d}");
    }

    for card in &cards {
        println!("\n  {}", card.display_name());
        for (key, value) in card.details() {
            println!("    {key:<6}: {value}");
        }

        if let (Some(photo), Some(dir)) = (&card.photo, photo_dir) {
            let dest = dir.join(format!("vcard_{:04}.{}", card.index + 1, photo.extension()));
            match photo.save_to_disk(&dest) {
                Ok(()) => println!("    ✓ Photo {}x{} saved to {}", photo.width(), photo.height(), dest.display()),
                Err(e) => eprintln!("    ✗ Save failed: {e}"),
            }
        }
    }
}
