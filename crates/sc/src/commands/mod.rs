//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod scan;
pub(crate) mod tags;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use sc_config::{CliSettings, Config};

use crate::error::CliError;

pub(crate) use render::RenderArgs;
pub(crate) use scan::ScanArgs;
pub(crate) use tags::TagsArgs;

/// Configuration options shared by all commands.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover sc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL for generated links (overrides config).
    #[arg(long, env = "SC_WEB_URL")]
    web_url: Option<String>,

    /// Default locale for the date tag (overrides config).
    #[arg(long)]
    locale: Option<String>,

    /// Directory scanned for the listing tag (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load the configuration with the CLI overrides applied.
    pub(crate) fn load(self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            web_url: self.web_url,
            locale: self.locale,
            source_dir: self.source_dir,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Read a document from `path`, or from stdin when it is absent or `-`.
///
/// Returns the text and the directory relative file references resolve
/// against.
pub(crate) fn read_input(path: Option<&Path>) -> Result<(String, PathBuf), CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            let text = std::fs::read_to_string(path)?;
            let base_dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map_or_else(std::env::current_dir, |parent| Ok(parent.to_path_buf()))?;
            Ok((text, base_dir))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok((text, std::env::current_dir()?))
        }
    }
}
