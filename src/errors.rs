use thiserror::Error;

use crate::cursor;

/// Reasons a parsing function can fail.
///
/// Both variants leave the cursor where it was before the failed attempt.
/// `Mismatch` is the everyday failure that alternation and repetition
/// recover from. `EndOfInput` means a lookahead ran past the end of the
/// source; only the file loop treats it as a normal way to stop.
///
/// Errors only carry a byte offset. Line and column are computed on demand
/// with [`ParseError::location`] once an error leaves the parser.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {rule} at byte {position}, found {context:?}")]
    Mismatch {
        /// name of the rule that was attempted, e.g. `citekey`
        rule: String,
        /// a short excerpt of the unconsumed input
        context: String,
        /// byte offset into the source
        position: usize,
    },
    #[error("unexpected end of input at byte {position}")]
    EndOfInput { position: usize },
}

impl ParseError {
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Self::EndOfInput { .. })
    }

    /// Name of the rule that failed, `None` for `EndOfInput`.
    pub fn rule(&self) -> Option<&str> {
        match self {
            Self::Mismatch { rule, .. } => Some(rule),
            Self::EndOfInput { .. } => None,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            Self::Mismatch { position, .. } | Self::EndOfInput { position } => *position,
        }
    }

    /// 1-based line and column of the failure within `src`, the text that
    /// was being parsed.
    pub fn location(&self, src: &str) -> (usize, usize) {
        cursor::line_column(src, self.position())
    }
}
