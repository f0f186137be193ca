use crate::{Result, VcardError, CANONICAL_NAME, STRUCTURED_NAME};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// `NAME[;PARAMS]:VALUE[;VALUE2…]` up to the end of the line.
static PROPERTY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<param>.*?):(?P<value>.*?)\n").expect("invalid property regex")
});

const DEFAULT_PARAMETERS: [&str; 8] = ["N", "FN", "TITLE", "ORG", "ADR", "TEL", "EMAIL", "URL"];

// ── RecognizedParameterSet ───────────────────────────────────────────────────

/// Ordered set of property names the extractor captures.
///
/// Always contains the defaults (`N FN TITLE ORG ADR TEL EMAIL URL`); callers
/// may add more before handing the set to a reader.
///
/// ```
/// use vcfthumb::RecognizedParameterSet;
///
/// let set = RecognizedParameterSet::default().with_extra(["nickname", "BDAY"]).unwrap();
/// assert!(set.contains("NICKNAME"));
/// assert_eq!(set.len(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedParameterSet {
    names: Vec<String>,
}

impl Default for RecognizedParameterSet {
    fn default() -> Self {
        Self {
            names: DEFAULT_PARAMETERS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

impl RecognizedParameterSet {
    /// Add `name` (uppercased). Returns `Ok(false)` when it was already present.
    pub fn insert(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty()
            || name
                .chars()
                .any(|c| c == ':' || c == ';' || c.is_whitespace())
        {
            return Err(VcardError::InvalidParameterName(name.to_owned()));
        }

        let upper = name.to_ascii_uppercase();
        if self.contains(&upper) {
            tracing::info!("vcard parameter {upper} is already included in the parser");
            return Ok(false);
        }
        self.names.push(upper);
        Ok(true)
    }

    /// Consume the set and return it with every name in `extra` added.
    pub fn with_extra<I, S>(mut self, extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in extra {
            self.insert(name.as_ref())?;
        }
        Ok(self)
    }

    /// Exact, case-sensitive lookup of an already-uppercased key.
    pub fn contains(&self, key: &str) -> bool {
        self.names.iter().any(|n| n == key)
    }

    /// Names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of recognised names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` when no name is recognised.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ── Extraction ───────────────────────────────────────────────────────────────

/// Raw result of scanning one record's property lines, before the name rule
/// is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedProperties {
    /// First value seen for each recognised key.
    pub attributes: BTreeMap<String, String>,

    /// An `N` line was present (recognised or not).
    pub structured_name: bool,

    /// An `FN` line was present (recognised or not).
    pub formatted_name: bool,
}

/// Scan `text` line by line and capture recognised properties.
///
/// The key is the uppercased text before the first `;` of the name part; the
/// value is the text before the first `;` of the value part. Structured values
/// such as `N:Doe;John;;;` therefore keep only their first component. For
/// repeated keys the first line wins.
pub fn extract_properties(text: &str, parameters: &RecognizedParameterSet) -> ExtractedProperties {
    let mut out = ExtractedProperties::default();

    for caps in PROPERTY_LINE.captures_iter(text) {
        let param = caps["param"].to_uppercase();
        let key = param.split(';').next().unwrap_or_default();
        let value = caps["value"].split(';').next().unwrap_or_default();

        if key == STRUCTURED_NAME {
            out.structured_name = true;
        }
        if key == CANONICAL_NAME {
            out.formatted_name = true;
        }

        if parameters.contains(key) && !out.attributes.contains_key(key) {
            out.attributes.insert(key.to_owned(), value.to_owned());
        }
    }

    out
}
