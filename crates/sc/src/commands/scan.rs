//! `sc scan` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use sc_tags::TagEngine;

use super::{ConfigArgs, read_input};
use crate::engine::build_engine;
use crate::error::CliError;
use crate::frontmatter::parse_document;
use crate::output::Output;

/// Arguments for the scan command.
#[derive(Args)]
pub(crate) struct ScanArgs {
    /// Document to scan (default: stdin).
    file: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,
}

impl ScanArgs {
    /// Execute the scan command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or front matter parsing fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.config.load()?;
        let engine = build_engine(&config, output)?;
        let (source, _) = read_input(self.file.as_deref())?;

        let mut stdout = std::io::stdout().lock();
        for line in scan(&engine, &source)? {
            writeln!(stdout, "{line}")?;
        }
        Ok(())
    }
}

/// One line per top-level tag: `line:col name attrs`.
///
/// Positions are 1-based and count from the start of the file, front matter
/// included.
fn scan(engine: &TagEngine, source: &str) -> Result<Vec<String>, CliError> {
    let (_, body) = parse_document(source)?;
    let body_offset = source.len() - body.len();

    Ok(engine
        .find_tags(body)
        .into_iter()
        .map(|tag| {
            let (line, col) = line_col(source, body_offset + tag.start);
            let kind = if tag.close.is_some() { "paired" } else { "single" };
            format!("{line}:{col} {} ({kind}) {}", tag.name, tag.attrs)
                .trim_end()
                .to_owned()
        })
        .collect())
}

fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (line, before[line_start..].chars().count() + 1)
}
