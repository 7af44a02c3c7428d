use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One record of a `.bib` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParsedEntry {
    /// entry type in lowercase, e.g. “article”
    pub entry_type: String,
    /// citation key, e.g. “brezis93:_leapf_inter_compet”
    pub citekey: String,
    /// map of fields, e.g. “author” mapped to “Elise S. Brezis and Paul R. Krugman”.
    /// Values come without their outer braces or quotes, otherwise verbatim.
    pub tags: HashMap<String, String>,
}

impl ParsedEntry {
    pub fn new(entry_type: &str, citekey: &str) -> ParsedEntry {
        ParsedEntry {
            entry_type: entry_type.to_lowercase(),
            citekey: citekey.to_string(),
            tags: HashMap::new(),
        }
    }

    /// Raw value of the field `name`.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    /// Removes Teχ's groups from a string. For example,
    /// given a string like “Written by {{Lukas} and {tajpulo}}”
    /// returns “Written by Lukas and tajpulo”.
    /// Unbalanced input is returned unchanged.
    pub fn degroup(src: &str) -> String {
        let mut result = String::new();
        let mut level: isize = 0;
        let mut escape = false;
        for chr in src.chars() {
            if chr == '{' && !escape {
                level += 1;
            } else if chr == '}' && !escape {
                level -= 1;
                if level < 0 {
                    return src.to_string();
                }
            } else if chr == '\\' {
                if escape {
                    result.push(chr);
                }
                escape = !escape;
            } else {
                if escape {
                    result.push('\\');
                }
                result.push(chr);
                escape = false;
            }
        }
        if level == 0 {
            result
        } else {
            src.to_string()
        }
    }

    /// Merges runs of whitespace (including line breaks inside long
    /// field values) into a single space.
    pub fn reduce_whitespace(src: &str) -> String {
        src.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Field `name` as plain text for the `--list` output: TeX escapes
    /// and accents common in bibliographies are spelled as Unicode, then
    /// groups and extra whitespace are dropped.
    pub fn plain_text(&self, name: &str) -> Option<String> {
        let text = TEX_SYMBOLS
            .iter()
            .fold(self.tag(name)?.to_string(), |text, (tex, symbol)| {
                text.replace(tex, symbol)
            });
        Some(Self::reduce_whitespace(&Self::degroup(&text)))
    }
}

// Longer sequences come first, `---` must be replaced before `--`.
const TEX_SYMBOLS: [(&str, &str); 19] = [
    ("\\\"{a}", "ä"),
    ("\\\"{o}", "ö"),
    ("\\\"{u}", "ü"),
    ("\\\"a", "ä"),
    ("\\\"o", "ö"),
    ("\\\"u", "ü"),
    ("\\'{e}", "é"),
    ("\\'e", "é"),
    ("\\ss{}", "ß"),
    ("\\&", "&"),
    ("\\%", "%"),
    ("\\_", "_"),
    ("\\#", "#"),
    ("\\$", "$"),
    ("``", "“"),
    ("''", "”"),
    ("---", "—"),
    ("--", "–"),
    ("~", "\u{00A0}"),
];
