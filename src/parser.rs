use std::convert::Infallible;
use std::fs;
use std::io;
use std::path;
use std::str;

use crate::cursor::Cursor;
use crate::errors::ParseError;
use crate::grammar;
use crate::types::ParsedEntry;

/// Parser owning the source text of one `.bib` file
pub struct Parser {
    pub(crate) src: String,
}

impl Parser {
    /// Use a file at some filepath as source for the parsing process.
    pub fn from_file<P: AsRef<path::Path>>(path: P) -> Result<Parser, io::Error> {
        let src = fs::read_to_string(path)?;
        Ok(Parser { src })
    }

    /// Use a string as source for the parsing process.
    pub fn from_string(src: String) -> Parser {
        Parser { src }
    }

    pub fn source(&self) -> &str {
        &self.src
    }

    /// Parses all entries at once. Every call starts from the beginning of
    /// the source, so repeated calls give equal results.
    pub fn parse(&self) -> Result<Vec<ParsedEntry>, ParseError> {
        grammar::bibliography_file(&mut Cursor::new(&self.src))
    }

    pub fn iter(&self) -> BibEntries<'_> {
        BibEntries {
            cursor: Cursor::new(&self.src),
            finished: false,
        }
    }
}

impl str::FromStr for Parser {
    type Err = Infallible;

    /// Use a string as source for the parsing process.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Ok(Parser::from_string(src.to_string()))
    }
}

/// A stateful iterator yielding one entry after another.
/// After the first error it yields nothing more.
pub struct BibEntries<'s> {
    cursor: Cursor<'s>,
    finished: bool,
}

impl<'s> BibEntries<'s> {
    /// Byte offset up to which the source has been consumed.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }
}

impl<'s> Iterator for BibEntries<'s> {
    type Item = Result<ParsedEntry, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = grammar::next_entry(&mut self.cursor);
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error;
    use std::str::FromStr;

    #[test]
    fn test_tolkien() -> Result<(), Box<dyn error::Error>> {
        let p = Parser::from_str("@book{tolkien1937, author = {J. R. R. Tolkien}}")?;
        let mut count = 0;
        for e in p.iter() {
            let entry = e?;
            assert_eq!(entry.entry_type, "book");
            assert_eq!(entry.citekey, "tolkien1937");
            assert_eq!(entry.tag("author"), Some("J. R. R. Tolkien"));
            count += 1;
        }
        assert_eq!(count, 1);
        Ok(())
    }

    #[test]
    fn test_taocp() -> Result<(), Box<dyn error::Error>> {
        let src = r#"@book{Knuth97,
  author    = {Donald Ervin Knuth},
  title     = {The art of computer programming, Volume {I:} Fundamental Algorithms,
               3rd Edition},
  publisher = {Addison-Wesley},
  year      = {1997},
  url       = {https://www.worldcat.org/oclc/312910844},
  isbn      = {0201896834},
  timestamp = {Fri, 17 Jul 2020 16:12:39 +0200},
  biburl    = {https://dblp.org/rec/books/lib/Knuth97.bib},
  bibsource = {{dblp computer science bibliography}, https://dblp.org}
}"#;
        let p = Parser::from_str(src)?;
        assert_eq!(p.source(), src);
        let mut iter = p.iter();
        let entry = iter.next().unwrap()?;
        assert_eq!(entry.entry_type, "book");
        assert_eq!(entry.citekey, "Knuth97");
        assert_eq!(entry.tag("year"), Some("1997"));
        assert_eq!(
            entry.tag("bibsource"),
            Some("{dblp computer science bibliography}, https://dblp.org")
        );
        assert!(iter.next().is_none());
        Ok(())
    }

    #[test]
    fn test_iter_stops_after_error() -> Result<(), Box<dyn error::Error>> {
        let p = Parser::from_str("@misc{a, note={x}}\n@misc{b, note={y}\n@misc{c, note={z}}")?;
        let mut iter = p.iter();
        assert_eq!(iter.position(), 0);
        assert_eq!(iter.next().unwrap()?.citekey, "a");
        assert_eq!(iter.position(), "@misc{a, note={x}}".len());
        let err = iter.next().unwrap().unwrap_err();
        assert_eq!(err.location(p.source()), (3, 1));
        assert!(iter.next().is_none());
        assert!(p.parse().is_err());
        Ok(())
    }

    #[test]
    fn test_parse_twice() -> Result<(), Box<dyn error::Error>> {
        let p = Parser::from_string("@article{k1, author={A. One and B. Two}, year=1999}".to_string());
        let first = p.parse()?;
        assert_eq!(first.len(), 1);
        assert_eq!(first, p.parse()?);
        assert_eq!(p.iter().collect::<Result<Vec<_>, _>>()?, first);
        Ok(())
    }
}
