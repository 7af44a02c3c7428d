//! Single-character classifiers.
//!
//! Each one peeks one character, consumes it when it belongs to the
//! classifier's set and returns it as a one-character slice of the source.

use crate::combinators::Parse;
use crate::cursor::Cursor;
use crate::errors::ParseError;

pub const WHITESPACE: &str = " \t\n\r";
pub const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

fn classify<'s, F>(cursor: &mut Cursor<'s>, rule: &str, accept: F) -> Result<&'s str, ParseError>
where
    F: Fn(char) -> bool,
{
    let c = cursor.peek(1)?;
    match c.chars().next() {
        Some(chr) if accept(chr) => {
            cursor.advance(1);
            Ok(c)
        }
        _ => Err(cursor.mismatch(rule)),
    }
}

/// space, tab, newline or carriage return
pub fn whitespace<'s>(cursor: &mut Cursor<'s>) -> Result<&'s str, ParseError> {
    classify(cursor, "whitespace", |chr| WHITESPACE.contains(chr))
}

/// ASCII `a`-`z` and `A`-`Z`
pub fn letter<'s>(cursor: &mut Cursor<'s>) -> Result<&'s str, ParseError> {
    classify(cursor, "letter", |chr| chr.is_ascii_alphabetic())
}

pub fn digit<'s>(cursor: &mut Cursor<'s>) -> Result<&'s str, ParseError> {
    classify(cursor, "digit", |chr| chr.is_ascii_digit())
}

/// Any character outside of ASCII, e.g. accented or CJK letters in
/// author names and titles.
pub fn non_ascii<'s>(cursor: &mut Cursor<'s>) -> Result<&'s str, ParseError> {
    classify(cursor, "non-ASCII character", |chr| !chr.is_ascii())
}

/// ASCII punctuation minus the characters in `exclude`.
#[derive(Clone, Copy, Debug)]
pub struct Punctuation {
    exclude: &'static str,
}

impl<'s> Parse<'s> for Punctuation {
    type Output = &'s str;

    fn parse(&self, cursor: &mut Cursor<'s>) -> Result<&'s str, ParseError> {
        classify(cursor, "punctuation", |chr| {
            PUNCTUATION.contains(chr) && !self.exclude.contains(chr)
        })
    }
}

pub fn punctuation(exclude: &'static str) -> Punctuation {
    Punctuation { exclude }
}
