//! English/Urdu text pair extraction.
//!
//! Bank content arrives in two shapes: a dedicated Urdu field, or a single
//! field with both languages concatenated ("State Ohm's law. اوہم کا قانون
//! بیان کریں۔"). `normalize` sorts this out using Arabic-script Unicode
//! block membership only — no word lists.
//!
//! The function is pure and idempotent: the server re-derives the pair on
//! every fetch, so running it on its own output must reproduce the same
//! split exactly.

use crate::util::is_arabic_script;

/// The normalized pair. Either side may be empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BilingualText {
    pub primary: String,
    pub secondary: String,
}

/// An Urdu "run" must be at least this many Arabic-script characters to act
/// as a split point; a lone stray character never splits English text.
const MIN_URDU_RUN: usize = 2;

/// Extract the `{english, urdu}` pair from a raw primary field and an
/// optional raw secondary field.
pub fn normalize(primary_raw: &str, secondary_raw: Option<&str>) -> BilingualText {
    // A dedicated Urdu field wins, but only if it actually holds Urdu.
    if let Some(sec) = secondary_raw {
        if !sec.trim().is_empty() && contains_arabic(sec) {
            return BilingualText {
                primary: primary_raw.to_string(),
                secondary: sec.to_string(),
            };
        }
    }

    if !contains_arabic(primary_raw) {
        // Pure English. A non-Urdu secondary field carries no script we can
        // attribute, so it is dropped.
        return BilingualText {
            primary: primary_raw.to_string(),
            secondary: String::new(),
        };
    }

    // Mixed field: greedy split at the first long run of Urdu script.
    match split_at_urdu_run(primary_raw) {
        Some((en, ur)) => BilingualText {
            primary: en,
            secondary: ur,
        },
        // Urdu present but no clean split point: the whole field is Urdu.
        None => BilingualText {
            primary: String::new(),
            secondary: primary_raw.trim().to_string(),
        },
    }
}

fn contains_arabic(s: &str) -> bool {
    s.chars().any(is_arabic_script)
}

/// Find the first run of >= MIN_URDU_RUN Arabic-script characters
/// (whitespace between Arabic characters does not break a run) and split
/// there. Returns None when no such run exists or the English prefix would
/// be empty.
fn split_at_urdu_run(s: &str) -> Option<(String, String)> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut i = 0;
    while i < chars.len() {
        if is_arabic_script(chars[i].1) {
            // Measure the run, letting whitespace bridge Arabic words.
            let mut arabic_len = 1;
            let mut j = i + 1;
            while j < chars.len() {
                let c = chars[j].1;
                if is_arabic_script(c) {
                    arabic_len += 1;
                    j += 1;
                } else if c.is_whitespace() && j + 1 < chars.len() && is_arabic_script(chars[j + 1].1) {
                    j += 1;
                } else {
                    break;
                }
            }
            if arabic_len >= MIN_URDU_RUN {
                let split_byte = chars[i].0;
                let prefix = s[..split_byte].trim();
                if prefix.is_empty() {
                    return None;
                }
                return Some((prefix.to_string(), s[split_byte..].trim().to_string()));
            }
            i = j.max(i + 1);
        } else {
            i += 1;
        }
    }
    None
}
