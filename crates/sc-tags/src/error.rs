//! Error types for built-in tags.

use sc_engine::ShortcodeError;

/// Error returned by a built-in tag while rendering.
///
/// Converted into the engine's handler error, so a failing tag surfaces as
/// [`ShortcodeError::Handler`] naming the tag.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// Attribute value that the tag cannot interpret.
    #[error("invalid {option} `{value}`: expected {expected}")]
    InvalidOption {
        option: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Locale name not known to the date formatter.
    #[error("unknown locale `{0}`")]
    UnknownLocale(String),
    /// Malformed strftime format string.
    #[error("invalid date format `{0}`")]
    InvalidDateFormat(String),
}

/// Error compiling a placeholder template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// `{` without a closing `}`.
    #[error("unclosed placeholder at offset {0}")]
    Unclosed(usize),
    /// `{}` or `{ }`.
    #[error("empty placeholder at offset {0}")]
    Empty(usize),
    /// Placeholder name with characters outside `[A-Za-z0-9_.-]`.
    #[error("invalid placeholder `{name}` at offset {offset}")]
    InvalidName { name: String, offset: usize },
    /// `}` that does not close a placeholder and is not doubled.
    #[error("unmatched `}}` at offset {0}")]
    UnmatchedClose(usize),
}

/// Error registering configured tags.
#[derive(Debug, thiserror::Error)]
pub enum TagConfigError {
    /// Alias target is not a built-in tag.
    #[error("unknown built-in tag `{0}`")]
    UnknownBuiltin(String),
    /// Template tag whose template does not compile.
    #[error("invalid template for [{tag}]: {source}")]
    Template {
        tag: String,
        #[source]
        source: TemplateError,
    },
    /// Registration rejected by the engine.
    #[error(transparent)]
    Shortcode(#[from] ShortcodeError),
}
