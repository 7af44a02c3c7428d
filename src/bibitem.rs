//! Renders parsed entries as `\bibitem` blocks of a `thebibliography`
//! environment.

use std::fmt;

use crate::types::ParsedEntry;

/// Entry types with their own template. Anything else is rendered with
/// the generic [`EntryKind::Misc`] layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Article,
    Book,
    InProceedings,
    Misc(String),
}

impl From<&str> for EntryKind {
    fn from(entry_type: &str) -> Self {
        match entry_type.to_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "inproceedings" | "conference" => Self::InProceedings,
            other => Self::Misc(other.to_string()),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Article => write!(f, "article"),
            Self::Book => write!(f, "book"),
            Self::InProceedings => write!(f, "inproceedings"),
            Self::Misc(name) => write!(f, "{}", name),
        }
    }
}

// Field lookup that tolerates `Author` next to `author`.
fn field(entry: &ParsedEntry, name: &str) -> Option<String> {
    entry
        .tag(name)
        .or_else(|| {
            entry
                .tags
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
        .map(ParsedEntry::reduce_whitespace)
        .filter(|value| !value.is_empty())
}

/// Joins a BibTeX author list: `A`, `A and B`, `A, B and C`.
pub fn join_authors(authors: &str) -> String {
    let names: Vec<&str> = authors
        .split(" and ")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

/// Turns every run of hyphens into the `--` en-dash of a page range.
pub fn normalize_pages(pages: &str) -> String {
    let mut result = String::with_capacity(pages.len() + 1);
    let mut in_dash = false;
    for chr in pages.chars() {
        if chr == '-' {
            if !in_dash {
                result.push_str("--");
            }
            in_dash = true;
        } else {
            result.push(chr);
            in_dash = false;
        }
    }
    result
}

/// One `\bibitem{citekey}` block, e.g.
///
/// ```tex
/// \bibitem{k1}
/// A. One and B. Two, ``Title'', \textit{Journal} \textbf{12}(3), 45--67 (1999).
/// ```
///
/// Missing fields are left out.
pub fn render_entry(entry: &ParsedEntry) -> String {
    let get = |name: &str| field(entry, name);
    let quoted = |title: String| format!("``{}''", title);

    let mut parts: Vec<String> = Vec::new();
    let mut push = |part: Option<String>| {
        if let Some(part) = part {
            parts.push(part);
        }
    };

    push(get("author").map(|a| join_authors(&a)));
    match EntryKind::from(entry.entry_type.as_str()) {
        EntryKind::Article => {
            push(get("title").map(quoted));
            let mut journal = get("journal").map(|j| format!("\\textit{{{}}}", j));
            if let Some(volume) = get("volume") {
                let volume = match get("number") {
                    Some(number) => format!("\\textbf{{{}}}({})", volume, number),
                    None => format!("\\textbf{{{}}}", volume),
                };
                journal = Some(match journal {
                    Some(journal) => format!("{} {}", journal, volume),
                    None => volume,
                });
            }
            push(journal);
            push(get("pages").map(|p| normalize_pages(&p)));
        }
        EntryKind::Book => {
            push(get("title").map(|t| format!("\\textit{{{}}}", t)));
            push(get("edition").map(|e| format!("{} ed.", e)));
            push(get("publisher"));
            push(get("address"));
        }
        EntryKind::InProceedings => {
            push(get("title").map(quoted));
            push(get("booktitle").map(|b| format!("in \\textit{{{}}}", b)));
            push(get("pages").map(|p| format!("pp.~{}", normalize_pages(&p))));
            push(get("publisher"));
        }
        EntryKind::Misc(_) => {
            push(get("title").map(quoted));
            push(get("howpublished"));
            push(get("note"));
        }
    }

    let mut text = parts.join(", ");
    if let Some(year) = get("year") {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&format!("({})", year));
    }
    format!("\\bibitem{{{}}}\n{}.\n", entry.citekey, text)
}

/// A complete `thebibliography` environment, entries in the given order.
pub fn render_bibliography(entries: &[ParsedEntry]) -> String {
    let widest_label = "9".repeat(entries.len().max(1).to_string().len());
    let mut out = format!("\\begin{{thebibliography}}{{{}}}\n", widest_label);
    for entry in entries {
        out.push('\n');
        out.push_str(&render_entry(entry));
    }
    out.push_str("\n\\end{thebibliography}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use std::error;

    fn entry(entry_type: &str, citekey: &str, tags: &[(&str, &str)]) -> ParsedEntry {
        let mut entry = ParsedEntry::new(entry_type, citekey);
        for (name, value) in tags {
            entry.tags.insert(name.to_string(), value.to_string());
        }
        entry
    }

    #[test]
    fn test_entry_kind() {
        assert_eq!(EntryKind::from("article"), EntryKind::Article);
        assert_eq!(EntryKind::from("Book"), EntryKind::Book);
        assert_eq!(EntryKind::from("conference"), EntryKind::InProceedings);
        assert_eq!(
            EntryKind::from("phdthesis"),
            EntryKind::Misc("phdthesis".to_string())
        );
        assert_eq!(EntryKind::from("phdthesis").to_string(), "phdthesis");
    }

    #[test]
    fn test_join_authors() {
        assert_eq!(join_authors("A. One"), "A. One");
        assert_eq!(join_authors("A. One and B. Two"), "A. One and B. Two");
        assert_eq!(
            join_authors("Elise S. Brezis and Paul R. Krugman and Daniel Tsiddon"),
            "Elise S. Brezis, Paul R. Krugman and Daniel Tsiddon"
        );
        assert_eq!(join_authors(""), "");
    }

    #[test]
    fn test_normalize_pages() {
        assert_eq!(normalize_pages("12-34"), "12--34");
        assert_eq!(normalize_pages("12--34"), "12--34");
        assert_eq!(normalize_pages("12 --- 34"), "12 -- 34");
        assert_eq!(normalize_pages("7"), "7");
    }

    #[test]
    fn test_render_article() {
        let article = entry(
            "article",
            "brezis93",
            &[
                ("author", "Elise S. Brezis and Paul R. Krugman and Daniel Tsiddon"),
                ("title", "Leapfrogging in International Competition"),
                ("journal", "American Economic Review"),
                ("volume", "83"),
                ("number", "5"),
                ("pages", "1211-1219"),
                ("year", "1993"),
            ],
        );
        assert_eq!(
            render_entry(&article),
            "\\bibitem{brezis93}\n\
             Elise S. Brezis, Paul R. Krugman and Daniel Tsiddon, \
             ``Leapfrogging in International Competition'', \
             \\textit{American Economic Review} \\textbf{83}(5), 1211--1219 (1993).\n"
        );
    }

    #[test]
    fn test_render_book_with_missing_fields() {
        let book = entry(
            "book",
            "tolkien1937",
            &[("Author", "J. R. R. Tolkien"), ("title", "The Hobbit")],
        );
        assert_eq!(
            render_entry(&book),
            "\\bibitem{tolkien1937}\nJ. R. R. Tolkien, \\textit{The Hobbit}.\n"
        );
    }

    #[test]
    fn test_render_misc_fallback() {
        let misc = entry("online", "web", &[("title", "Homepage"), ("note", "visited")]);
        assert_eq!(
            render_entry(&misc),
            "\\bibitem{web}\n``Homepage'', visited.\n"
        );
    }

    #[test]
    fn test_render_bibliography_keeps_order() -> Result<(), Box<dyn error::Error>> {
        let src = "@book{b, title={Second}, year=2}\n\n@inproceedings{a, title={First},\n booktitle={Proc.}, pages={3-4}}";
        let entries = Parser::from_string(src.to_string()).parse()?;
        let rendered = render_bibliography(&entries);
        assert_eq!(
            rendered,
            "\\begin{thebibliography}{9}\n\
             \n\\bibitem{b}\n\\textit{Second} (2).\n\
             \n\\bibitem{a}\n``First'', in \\textit{Proc.}, pp.~3--4.\n\
             \n\\end{thebibliography}\n"
        );
        Ok(())
    }
}
