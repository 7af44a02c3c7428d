use std::error;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};

use bib2bibitem::{render_bibliography, EntryKind, ParseError, ParsedEntry, Parser};
use clap::Parser as CLIParser;
use log::{debug, info};

#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Settings {
    /// Filepath to file to parse
    #[clap(short, long)]
    input: String,

    /// Write the result to this file instead of stdout
    #[clap(short, long)]
    output: Option<String>,

    /// Return only entries with this citation key
    #[clap(short, long)]
    query_id: Option<String>,

    /// List entries and their fields instead of rendering \bibitem blocks
    #[clap(short, long)]
    list: bool,

    /// Print entries as JSON
    #[cfg(feature = "json")]
    #[clap(long)]
    json: bool,
}

fn human_readable(entries: &[ParsedEntry]) -> Result<String, Box<dyn error::Error>> {
    let mut out = String::new();
    for entry in entries {
        writeln!(out, "type = {}", EntryKind::from(entry.entry_type.as_str()))?;
        writeln!(out, "key = {}", entry.citekey)?;
        let mut names: Vec<&String> = entry.tags.keys().collect();
        names.sort();
        for name in names {
            let value = entry.plain_text(name).unwrap_or_default();
            writeln!(out, "\t{}\t= {}", name, value)?;
        }
    }
    Ok(out)
}

#[cfg(feature = "json")]
fn json(entries: Vec<ParsedEntry>) -> Result<String, Box<dyn error::Error>> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Entries {
        data: Vec<ParsedEntry>,
    }

    let mut out = serde_json::to_string(&Entries { data: entries })?;
    out.push('\n');
    Ok(out)
}

/// `file:line:column: message`, the location looked up in the parsed source.
fn report(input: &str, src: &str, err: &ParseError) -> String {
    let (line, column) = err.location(src);
    format!("{}:{}:{}: {}", input, line, column, err)
}

fn render(settings: &Settings, entries: Vec<ParsedEntry>) -> Result<String, Box<dyn error::Error>> {
    #[cfg(feature = "json")]
    {
        if settings.json {
            return json(entries);
        }
    }
    if settings.list {
        return human_readable(&entries);
    }
    Ok(render_bibliography(&entries))
}

fn main() -> Result<(), Box<dyn error::Error>> {
    env_logger::init();
    let settings = Settings::parse();
    debug!("{:?}", settings);

    let parser = Parser::from_file(&settings.input)?;
    let mut entries = parser
        .parse()
        .map_err(|err| report(&settings.input, parser.source(), &err))?;
    info!("parsed {} entries from {}", entries.len(), settings.input);

    if let Some(query) = &settings.query_id {
        entries.retain(|entry| &entry.citekey == query);
    }

    let rendered = render(&settings, entries)?;
    match &settings.output {
        Some(path) => fs::write(path, rendered)?,
        None => io::stdout().write_all(rendered.as_bytes())?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_points_at_line() {
        let parser = Parser::from_string("@misc{a, note={x}}\n@misc{#b}".to_string());
        let err = parser.parse().unwrap_err();
        assert_eq!(
            report("refs.bib", parser.source(), &err),
            r##"refs.bib:2:7: expected citekey at byte 25, found "#b}""##
        );
    }

    #[test]
    fn test_listing_ends_with_newline() -> Result<(), Box<dyn error::Error>> {
        let entries = Parser::from_string("@book{k, title={T}}".to_string()).parse()?;
        assert_eq!(human_readable(&entries)?, "type = book\nkey = k\n\ttitle\t= T\n");
        Ok(())
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_ends_with_newline() -> Result<(), Box<dyn error::Error>> {
        let entries = Parser::from_string("@book{k, title={T}}".to_string()).parse()?;
        let out = json(entries)?;
        assert!(out.ends_with("}\n"));
        assert_eq!(out.lines().count(), 1);
        Ok(())
    }
}
