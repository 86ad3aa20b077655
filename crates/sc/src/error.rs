//! CLI error types.

use sc_config::ConfigError;
use sc_engine::ShortcodeError;
use sc_tags::TagConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Shortcode(#[from] ShortcodeError),

    #[error("{0}")]
    TagConfig(#[from] TagConfigError),

    #[error("Invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
}
