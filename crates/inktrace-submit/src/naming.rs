//! File names derived from prompt labels.
//!
//! The same function names the uploaded file and predicts which remote files
//! mark an item as done, so both sides always agree.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use deunicode::deunicode_char;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Stem used when a label yields no usable characters
pub const FALLBACK_STEM: &str = "export";

/// Extension of every exported file
pub const SVG_EXTENSION: &str = "svg";

/// How a label becomes a file stem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NamingPolicy {
    /// `永` → `U+6C38`, `ab` → `U+0061-U+0062`. Collision-free and reversible.
    #[default]
    CodePoint,
    /// Latin transliteration without accents, keeping `[A-Za-z0-9_-]`:
    /// `Café` → `Cafe`, `永` → `yong`, `手寫` → `shou-xie`. Lossy.
    Transliterated,
}

impl NamingPolicy {
    pub fn file_stem(self, label: &str) -> String {
        let stem = match self {
            NamingPolicy::CodePoint => code_point_stem(label),
            NamingPolicy::Transliterated => transliterated_stem(label),
        };
        if stem.is_empty() {
            FALLBACK_STEM.to_string()
        } else {
            stem
        }
    }

    /// `<stem>.svg`
    pub fn file_name(self, label: &str) -> String {
        format!("{}.{}", self.file_stem(label), SVG_EXTENSION)
    }

    /// Recover the label from a [`NamingPolicy::CodePoint`] stem.
    ///
    /// Returns `None` for anything that is not a well-formed code point stem,
    /// including stems carrying an occurrence suffix; see [`split_occurrence`].
    pub fn decode_stem(stem: &str) -> Option<String> {
        stem.split('-').map(decode_code_point).collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NamingPolicy::CodePoint => "code-point",
            NamingPolicy::Transliterated => "transliterated",
        }
    }
}

impl fmt::Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "code-point" | "codepoint" | "unicode" => Ok(NamingPolicy::CodePoint),
            "transliterated" | "ascii" | "legacy" => Ok(NamingPolicy::Transliterated),
            other => Err(format!(
                "unknown naming policy '{other}', expected 'code-point' or 'transliterated'"
            )),
        }
    }
}

fn code_point_stem(label: &str) -> String {
    label
        .chars()
        .map(|c| format!("U+{:04X}", u32::from(c)))
        .collect::<Vec<_>>()
        .join("-")
}

fn decode_code_point(part: &str) -> Option<char> {
    let hex = part.strip_prefix("U+")?;
    if hex.len() < 4 || !hex.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

fn transliterated_stem(label: &str) -> String {
    let mut stem = String::with_capacity(label.len());
    // Han, kana and hangul syllables are written apart: 手寫 → shou-xie
    let mut after_syllable = false;

    for c in label.chars() {
        if c.is_ascii() {
            push_file_char(&mut stem, c);
            after_syllable = false;
            continue;
        }

        // Accented Latin decomposes to plain ASCII
        let stripped: String = c.nfkd().filter(|c| !is_combining_mark(*c)).collect();
        if stripped.is_ascii() {
            stripped.chars().for_each(|c| push_file_char(&mut stem, c));
            after_syllable = false;
            continue;
        }

        let latin = deunicode_char(c).map(str::trim).unwrap_or_default();
        if latin.is_empty() {
            continue;
        }
        let syllable = !(c.is_uppercase() || c.is_lowercase());
        if syllable {
            if after_syllable {
                stem.push('-');
            }
            latin
                .chars()
                .for_each(|c| push_file_char(&mut stem, c.to_ascii_lowercase()));
        } else {
            latin.chars().for_each(|c| push_file_char(&mut stem, c));
        }
        after_syllable = syllable;
    }
    stem
}

fn push_file_char(stem: &mut String, c: char) {
    if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
        stem.push(c);
    } else if c.is_whitespace() {
        stem.push('-');
    }
}

/// Split a trailing `-<n>` occurrence suffix off a stem: `U+6C38-2` → (`U+6C38`, 2)
pub fn split_occurrence(stem: &str) -> (&str, u32) {
    if let Some((base, suffix)) = stem.rsplit_once('-') {
        if !base.is_empty() && !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = suffix.parse() {
                return (base, n);
            }
        }
    }
    (stem, 0)
}

/// Expected remote stem of every item, in order.
///
/// The first item with a given stem maps to that stem, the `k`-th repeat to
/// `stem-k`, mirroring the suffixes the dedup step hands out. Repeats are
/// counted per stem, so distinct labels sharing a stem are numbered too.
pub fn expected_stems<L: AsRef<str>>(labels: &[L], policy: NamingPolicy) -> Vec<String> {
    let mut seen: HashMap<String, u32> = HashMap::new();
    labels
        .iter()
        .map(|label| {
            let stem = policy.file_stem(label.as_ref());
            let occurrence = seen.entry(stem.clone()).or_insert(0);
            let expected = if *occurrence == 0 {
                stem
            } else {
                format!("{stem}-{occurrence}")
            };
            *occurrence += 1;
            expected
        })
        .collect()
}
