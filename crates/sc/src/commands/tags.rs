//! `sc tags` command implementation.

use std::io::Write;

use clap::Args;
use sc_config::{Config, TagConfig};
use sc_tags::Builtin;

use super::ConfigArgs;
use crate::engine::build_engine;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tags command.
#[derive(Args)]
pub(crate) struct TagsArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

impl TagsArgs {
    /// Execute the tags command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a configured tag is invalid.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.config.load()?;
        let engine = build_engine(&config, output)?;

        let mut stdout = std::io::stdout().lock();
        for name in engine.tags() {
            writeln!(stdout, "{name:<12} {}", describe(&config, name))?;
        }
        Ok(())
    }
}

/// Where a registered tag comes from.
fn describe(config: &Config, name: &str) -> String {
    match config.tags.get(name) {
        Some(TagConfig {
            alias: Some(target),
            ..
        }) => format!("alias of {target}"),
        Some(_) => "template".to_owned(),
        None if name.parse::<Builtin>().is_ok() => "builtin".to_owned(),
        None => String::new(),
    }
}
