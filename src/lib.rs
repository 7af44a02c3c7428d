//! This crate reads `.bib` files and turns their entries into `\bibitem`
//! lists for LaTeX documents.
//!
//! One entry in such a file can look like this:
//!
//! ```tex
//! @article{brezis93:_leapf_inter_compet,
//!     author  = {Elise S. Brezis and Paul R. Krugman and Daniel Tsiddon},
//!     title   = {Leapfrogging in International Competition},
//!     journal = "American Economic Review",
//!     volume  = 83,
//!     year    = 1993,
//! }
//! ```
//!
//! We call `article` the entry type and `brezis93:_leapf_inter_compet` the
//! citation key. Then we have a sequence of tags with a name (like `year`)
//! and a value (like `1993`).
//!
//! The parser is a small combinator engine: single-character
//! [`primitives`] run on a [`Cursor`], the [`combinators`] build bigger
//! parsers out of them, and the [`grammar`] module composes those into
//! rules for whole entries. A failing parser never consumes input, which is
//! what makes alternation and repetition work without backtracking state.
//!
//! ```rust
//! use bib2bibitem::Parser;
//! use std::str::FromStr;
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     //let p = Parser::from_file("source.bib")?;
//!     let p = Parser::from_str(r#"@book{tolkien1937, author = {J. R. R. Tolkien}}"#)?;
//!     for result in p.iter() {
//!         let entry = result?;
//!         println!("type = {}", entry.entry_type);
//!         println!("key = {}", entry.citekey);
//!         for (name, value) in entry.tags.iter() {
//!             println!("\t{}\t= {}", name, value);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The entire source string is kept in memory and parsed in one pass.

pub mod bibitem;
pub mod combinators;
pub mod cursor;
mod errors;
pub mod grammar;
mod parser;
pub mod primitives;
mod types;

pub use crate::bibitem::{render_bibliography, render_entry, EntryKind};
pub use crate::cursor::Cursor;
pub use crate::errors::ParseError;
pub use crate::parser::{BibEntries, Parser};
pub use crate::types::ParsedEntry;
