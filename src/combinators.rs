//! Generic parsing-function builders.
//!
//! Everything that takes a [`Cursor`] and either produces a value or fails
//! is a parser. Plain functions with the signature
//! `fn(&mut Cursor<'s>) -> Result<T, ParseError>` are parsers through a
//! blanket implementation, so grammar rules compose with the builders here
//! without any wrapping.
//!
//! Every parser leaves the cursor exactly where it was when it fails.
//! The combinators below run their sub-parsers through [`Cursor::attempt`],
//! which keeps that promise even for sequences that fail halfway.

use crate::cursor::Cursor;
use crate::errors::ParseError;

/// Core parser trait
pub trait Parse<'s> {
    type Output;

    /// Attempt to parse at the cursor position, advancing past the
    /// consumed text on success.
    fn parse(&self, cursor: &mut Cursor<'s>) -> Result<Self::Output, ParseError>;
}

impl<'s, F, T> Parse<'s> for F
where
    F: Fn(&mut Cursor<'s>) -> Result<T, ParseError>,
{
    type Output = T;

    fn parse(&self, cursor: &mut Cursor<'s>) -> Result<T, ParseError> {
        self(cursor)
    }
}

/// A borrowed parser of any shape, used where rules are listed together.
pub type DynParse<'p, 's, T> = &'p dyn Parse<'s, Output = T>;

/// Matches an exact, case-sensitive string.
#[derive(Clone, Copy, Debug)]
pub struct Literal {
    expected: &'static str,
}

impl<'s> Parse<'s> for Literal {
    type Output = &'s str;

    fn parse(&self, cursor: &mut Cursor<'s>) -> Result<&'s str, ParseError> {
        let n = self.expected.chars().count();
        // Too few characters left is an ordinary mismatch; only an empty
        // remainder reports the end of input.
        match cursor.peek(n) {
            Ok(found) if found == self.expected => {
                cursor.advance(n);
                Ok(found)
            }
            Err(err) if cursor.is_at_end() => Err(err),
            _ => Err(cursor.mismatch(&format!("{:?}", self.expected))),
        }
    }
}

pub fn literal(expected: &'static str) -> Literal {
    Literal { expected }
}

/// Runs every parser in order and collects their results.
pub struct Sequence<'p, 's, T> {
    parsers: &'p [DynParse<'p, 's, T>],
}

impl<'p, 's, T> Parse<'s> for Sequence<'p, 's, T> {
    type Output = Vec<T>;

    fn parse(&self, cursor: &mut Cursor<'s>) -> Result<Vec<T>, ParseError> {
        cursor.attempt(|c| self.parsers.iter().map(|p| p.parse(c)).collect())
    }
}

pub fn sequence<'p, 's, T>(parsers: &'p [DynParse<'p, 's, T>]) -> Sequence<'p, 's, T> {
    Sequence { parsers }
}

/// Applies a parser until it fails. Never fails itself.
pub struct ZeroOrMore<P> {
    parser: P,
}

impl<'s, P: Parse<'s>> Parse<'s> for ZeroOrMore<P> {
    type Output = Vec<P::Output>;

    fn parse(&self, cursor: &mut Cursor<'s>) -> Result<Self::Output, ParseError> {
        let mut results = Vec::new();
        repeat(&self.parser, cursor, &mut results);
        Ok(results)
    }
}

pub fn zero_or_more<'s, P: Parse<'s>>(parser: P) -> ZeroOrMore<P> {
    ZeroOrMore { parser }
}

/// Like [`ZeroOrMore`], but the first application has to succeed.
pub struct OneOrMore<P> {
    parser: P,
}

impl<'s, P: Parse<'s>> Parse<'s> for OneOrMore<P> {
    type Output = Vec<P::Output>;

    fn parse(&self, cursor: &mut Cursor<'s>) -> Result<Self::Output, ParseError> {
        let first = cursor.attempt(|c| self.parser.parse(c))?;
        let mut results = vec![first];
        repeat(&self.parser, cursor, &mut results);
        Ok(results)
    }
}

pub fn one_or_more<'s, P: Parse<'s>>(parser: P) -> OneOrMore<P> {
    OneOrMore { parser }
}

// Shared loop of the repetition combinators. Either failure kind ends the
// loop, and so does a success that consumed nothing.
fn repeat<'s, P: Parse<'s>>(parser: &P, cursor: &mut Cursor<'s>, results: &mut Vec<P::Output>) {
    loop {
        let before = cursor.position();
        match cursor.attempt(|c| parser.parse(c)) {
            Ok(value) => {
                results.push(value);
                if cursor.position() == before {
                    break;
                }
            }
            Err(_) => break,
        }
    }
}

/// Tries each parser against the same position; the first success wins.
pub struct FirstOf<'p, 's, T> {
    parsers: &'p [DynParse<'p, 's, T>],
}

impl<'p, 's, T> Parse<'s> for FirstOf<'p, 's, T> {
    type Output = T;

    fn parse(&self, cursor: &mut Cursor<'s>) -> Result<T, ParseError> {
        for parser in self.parsers {
            if let Ok(value) = cursor.attempt(|c| parser.parse(c)) {
                return Ok(value);
            }
        }
        Err(cursor.mismatch(&format!("one of {} alternatives", self.parsers.len())))
    }
}

pub fn first_of<'p, 's, T>(parsers: &'p [DynParse<'p, 's, T>]) -> FirstOf<'p, 's, T> {
    FirstOf { parsers }
}

/// Turns failure into `None`. Never fails itself.
pub struct Optional<P> {
    parser: P,
}

impl<'s, P: Parse<'s>> Parse<'s> for Optional<P> {
    type Output = Option<P::Output>;

    fn parse(&self, cursor: &mut Cursor<'s>) -> Result<Self::Output, ParseError> {
        Ok(cursor.attempt(|c| self.parser.parse(c)).ok())
    }
}

pub fn optional<'s, P: Parse<'s>>(parser: P) -> Optional<P> {
    Optional { parser }
}

/// Reports a mismatch of the wrapped parser under a grammar rule name.
/// `EndOfInput` passes through unchanged.
pub struct Named<P> {
    rule: &'static str,
    parser: P,
}

impl<'s, P: Parse<'s>> Parse<'s> for Named<P> {
    type Output = P::Output;

    fn parse(&self, cursor: &mut Cursor<'s>) -> Result<Self::Output, ParseError> {
        match cursor.attempt(|c| self.parser.parse(c)) {
            Err(ParseError::Mismatch { .. }) => Err(cursor.mismatch(self.rule)),
            other => other,
        }
    }
}

pub fn named<'s, P: Parse<'s>>(rule: &'static str, parser: P) -> Named<P> {
    Named { rule, parser }
}
