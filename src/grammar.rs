//! Grammar rules for `.bib` entries, built from the combinators and
//! primitives. A record looks like this:
//!
//! ```tex
//! @Article{brezis93:_leapf,
//!   author  = {Elise S. Brezis and Paul R. Krugman},
//!   title   = "Leapfrogging in International Competition",
//!   year    = 1993,
//! }
//! ```
//!
//! Field names and values are separated by commas. A field whose trailing
//! comma is missing ends the field list, so only the last field may omit it.

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::combinators::{first_of, literal, named, one_or_more, zero_or_more, DynParse, Parse};
use crate::cursor::Cursor;
use crate::errors::ParseError;
use crate::primitives::{digit, letter, non_ascii, punctuation, whitespace};
use crate::types::ParsedEntry;

/// Deepest nesting of `{...}` groups inside one field value. Every level is
/// a recursive call, so deeper input is rejected instead of risking the
/// stack.
pub const MAX_BRACE_DEPTH: usize = 64;

type Rule<'p, 's> = DynParse<'p, 's, &'s str>;

// The source text consumed since `start`.
fn consumed<'s>(cursor: &Cursor<'s>, start: usize) -> &'s str {
    &cursor.source()[start..cursor.position()]
}

/// Entry type such as `article`, case-folded to lowercase.
pub fn entry_type(cursor: &mut Cursor<'_>) -> Result<String, ParseError> {
    let letters = named("entry type", one_or_more(letter)).parse(cursor)?;
    Ok(letters.concat().to_lowercase())
}

/// Citation key made of letters, digits, `-`, `_` and `:`.
pub fn citekey<'s>(cursor: &mut Cursor<'s>) -> Result<String, ParseError> {
    let (hyphen, underscore, colon) = (literal("-"), literal("_"), literal(":"));
    let alternatives: [Rule<'_, 's>; 5] = [&letter, &digit, &hyphen, &underscore, &colon];
    let key = named("citekey", one_or_more(first_of(&alternatives))).parse(cursor)?;
    Ok(key.concat())
}

/// A `{...}` group, returned verbatim including its outer braces. Nested
/// groups are parsed recursively and kept as they are.
pub fn braced_value<'s>(cursor: &mut Cursor<'s>) -> Result<&'s str, ParseError> {
    cursor.attempt(|c| {
        let start = c.position();
        literal("{").parse(c)?;
        if c.depth() >= MAX_BRACE_DEPTH {
            return Err(c.mismatch("brace group within the nesting limit"));
        }

        c.enter_group();
        let no_braces = punctuation("{}");
        let alternatives: [Rule<'_, 's>; 6] = [
            &whitespace,
            &letter,
            &digit,
            &no_braces,
            &non_ascii,
            &braced_value,
        ];
        zero_or_more(first_of(&alternatives)).parse(c)?;
        c.leave_group();

        literal("}").parse(c)?;
        Ok(consumed(c, start))
    })
}

/// A `"..."` string, returned verbatim including its quotes.
pub fn quoted_value<'s>(cursor: &mut Cursor<'s>) -> Result<&'s str, ParseError> {
    cursor.attempt(|c| {
        let start = c.position();
        literal("\"").parse(c)?;
        let no_quote = punctuation("\"");
        let alternatives: [Rule<'_, 's>; 5] = [&whitespace, &letter, &digit, &no_quote, &non_ascii];
        zero_or_more(first_of(&alternatives)).parse(c)?;
        literal("\"").parse(c)?;
        Ok(consumed(c, start))
    })
}

/// A bare run of digits such as `1999`.
pub fn number<'s>(cursor: &mut Cursor<'s>) -> Result<&'s str, ParseError> {
    let start = cursor.position();
    one_or_more(digit).parse(cursor)?;
    Ok(consumed(cursor, start))
}

/// `name = value`, with the outer braces or quotes of the value removed.
pub fn tag<'s>(cursor: &mut Cursor<'s>) -> Result<(String, String), ParseError> {
    cursor.attempt(|c| {
        zero_or_more(whitespace).parse(c)?;
        let name = named("field name", one_or_more(letter)).parse(c)?.concat();
        zero_or_more(whitespace).parse(c)?;
        literal("=").parse(c)?;
        zero_or_more(whitespace).parse(c)?;

        let alternatives: [Rule<'_, 's>; 3] = [&braced_value, &quoted_value, &number];
        let raw = named("field value", first_of(&alternatives)).parse(c)?;
        let value = if raw.starts_with('{') || raw.starts_with('"') {
            &raw[1..raw.len() - 1]
        } else {
            raw
        };
        Ok((name, value.to_string()))
    })
}

/// One complete `@type{key, fields...}` record.
pub fn entry(cursor: &mut Cursor<'_>) -> Result<ParsedEntry, ParseError> {
    cursor.attempt(|c| {
        literal("@").parse(c)?;
        let entry_type = entry_type(c)?;
        literal("{").parse(c)?;
        let citekey = citekey(c)?;
        literal(",").parse(c)?;
        zero_or_more(whitespace).parse(c)?;

        let mut tags = HashMap::new();
        while let Ok((name, value)) = tag(c) {
            if let Some(previous) = tags.insert(name.clone(), value) {
                warn!(
                    "field '{}' of entry '{}' assigned twice, dropping {:?}",
                    name, citekey, previous
                );
            }
            if literal(",").parse(c).is_err() {
                break;
            }
        }

        zero_or_more(whitespace).parse(c)?;
        literal("}").parse(c)?;
        debug!(
            "parsed entry '{}' of type '{}' with {} fields",
            citekey,
            entry_type,
            tags.len()
        );
        Ok(ParsedEntry {
            entry_type,
            citekey,
            tags,
        })
    })
}

/// One step of the file loop: skips whitespace and parses the next entry.
/// Returns `None` once only whitespace is left.
pub fn next_entry(cursor: &mut Cursor<'_>) -> Option<Result<ParsedEntry, ParseError>> {
    if let Err(err) = zero_or_more(whitespace).parse(cursor) {
        return Some(Err(err));
    }
    match cursor.peek(1) {
        Err(ParseError::EndOfInput { position }) => {
            trace!("end of input at byte {}", position);
            None
        }
        _ => Some(entry(cursor)),
    }
}

/// All entries of a source text, in order of appearance. Fails on the first
/// entry that does not parse.
pub fn bibliography_file(cursor: &mut Cursor<'_>) -> Result<Vec<ParsedEntry>, ParseError> {
    let mut entries = Vec::new();
    while let Some(entry) = next_entry(cursor) {
        entries.push(entry?);
    }
    Ok(entries)
}
