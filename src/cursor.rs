use std::iter;

use crate::errors::ParseError;

/// Number of characters shown in diagnostics after the failing position.
const EXCERPT_LEN: usize = 10;

/// A position-tracking view over the source text.
///
/// A cursor is cheap to copy. Parsers that might fail work on a copy and
/// only write it back once they succeeded (see [`Cursor::attempt`]), so the
/// position of a cursor only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor<'s> {
    text: &'s str,
    position: usize,
    depth: usize,
}

impl<'s> Cursor<'s> {
    pub fn new(text: &'s str) -> Cursor<'s> {
        Cursor {
            text,
            position: 0,
            depth: 0,
        }
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn source(&self) -> &'s str {
        self.text
    }

    pub fn remaining(&self) -> &'s str {
        &self.text[self.position..]
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.text.len()
    }

    /// Returns the next `n` characters without advancing.
    pub fn peek(&self, n: usize) -> Result<&'s str, ParseError> {
        let rest = self.remaining();
        let end = rest
            .char_indices()
            .map(|(i, _)| i)
            .chain(iter::once(rest.len()))
            .nth(n);
        match end {
            Some(end) => Ok(&rest[..end]),
            None => Err(ParseError::EndOfInput {
                position: self.position,
            }),
        }
    }

    /// Moves forward by `n` characters. Callers peek at least `n`
    /// characters first; advancing past the end is a bug.
    pub fn advance(&mut self, n: usize) {
        let rest = self.remaining();
        let bytes = match rest.char_indices().nth(n) {
            Some((i, _)) => i,
            None => {
                debug_assert!(
                    rest.chars().count() == n,
                    "advanced {} characters with only {} left",
                    n,
                    rest.chars().count()
                );
                rest.len()
            }
        };
        self.position += bytes;
    }

    /// Runs `f` on a copy of this cursor and keeps the copy only if `f`
    /// succeeded. On failure `self` is untouched.
    pub fn attempt<T, F>(&mut self, f: F) -> Result<T, ParseError>
    where
        F: FnOnce(&mut Cursor<'s>) -> Result<T, ParseError>,
    {
        let mut trial = *self;
        let value = f(&mut trial)?;
        debug_assert!(trial.position >= self.position);
        *self = trial;
        Ok(value)
    }

    /// Up to ten upcoming characters, for error messages.
    pub fn excerpt(&self) -> &'s str {
        let rest = self.remaining();
        match rest.char_indices().nth(EXCERPT_LEN) {
            Some((i, _)) => &rest[..i],
            None => rest,
        }
    }

    /// 1-based line and column (in characters) of the current position.
    /// Scans the text up to here, so it is meant for reporting, not for
    /// use while parsing.
    pub fn location(&self) -> (usize, usize) {
        line_column(self.text, self.position)
    }

    /// Builds a `Mismatch` for `rule` at the current position.
    pub fn mismatch(&self, rule: &str) -> ParseError {
        ParseError::Mismatch {
            rule: rule.to_string(),
            context: self.excerpt().to_string(),
            position: self.position,
        }
    }

    /// Number of brace groups currently open.
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn enter_group(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn leave_group(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

pub(crate) fn line_column(text: &str, position: usize) -> (usize, usize) {
    let before = text.get(..position).unwrap_or(text);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error;

    #[test]
    fn test_new_cursor() {
        let cursor = Cursor::new("test src_str");
        assert_eq!(cursor.source(), "test src_str");
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_peek_retval() -> Result<(), Box<dyn error::Error>> {
        let mut cursor = Cursor::new("test src_str");
        cursor.advance(2);
        assert_eq!(cursor.peek(4)?, "st s");
        assert_eq!(cursor.position(), 2);
        Ok(())
    }

    #[test]
    fn test_peek_eof() {
        let mut cursor = Cursor::new("abc");
        cursor.advance(3);
        assert!(cursor.is_at_end());
        assert_eq!(
            cursor.peek(1),
            Err(ParseError::EndOfInput { position: 3 })
        );
    }

    #[test]
    fn test_peek_too_few_left() {
        let cursor = Cursor::new("ab");
        assert!(cursor.peek(3).unwrap_err().is_end_of_input());
        assert_eq!(cursor.peek(2), Ok("ab"));
        assert_eq!(cursor.peek(0), Ok(""));
    }

    #[test]
    fn test_multibyte_characters() -> Result<(), Box<dyn error::Error>> {
        let mut cursor = Cursor::new("テスト!");
        assert_eq!(cursor.peek(2)?, "テス");
        cursor.advance(3);
        assert_eq!(cursor.position(), "テスト".len());
        assert_eq!(cursor.peek(1)?, "!");
        Ok(())
    }

    #[test]
    fn test_attempt_rolls_back() {
        let mut cursor = Cursor::new("abcdef");
        let result: Result<(), ParseError> = cursor.attempt(|c| {
            c.advance(3);
            Err(c.mismatch("anything"))
        });
        assert!(result.is_err());
        assert_eq!(cursor.position(), 0);

        let result = cursor.attempt(|c| {
            c.advance(2);
            Ok(())
        });
        assert_eq!(result, Ok(()));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_location_and_excerpt() {
        let mut cursor = Cursor::new("@book{a,\n  title = {some long title}}");
        cursor.advance(11);
        assert_eq!(cursor.location(), (2, 3));
        assert_eq!(cursor.excerpt(), "title = {s");
    }

    #[test]
    fn test_mismatch_is_local() {
        let mut cursor = Cursor::new("line one\nline two");
        cursor.advance(9);
        assert_eq!(
            cursor.mismatch("digit"),
            ParseError::Mismatch {
                rule: "digit".to_string(),
                context: "line two".to_string(),
                position: 9,
            }
        );
        assert_eq!(cursor.mismatch("digit").location(cursor.source()), (2, 1));
    }
}
