//! Engine error types.

/// Error returned by a shortcode handler.
///
/// Handlers can use `?` on any error type that converts into a boxed error,
/// including plain strings: `return Err("missing path".into())`.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result returned by a shortcode handler.
///
/// `Ok(None)` splices nothing in place of the tag.
pub type HandlerResult = Result<Option<String>, HandlerError>;

/// Shortcode engine error.
#[derive(Debug, thiserror::Error)]
pub enum ShortcodeError {
    /// Tag name is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid tag name {0:?}: expected letters, digits, '_' or '-'")]
    InvalidTagName(String),

    /// A handler failed while rendering a tag.
    #[error("shortcode [{tag}] failed: {source}")]
    Handler {
        /// Name of the tag whose handler failed.
        tag: String,
        /// Error returned by the handler.
        #[source]
        source: HandlerError,
    },
}
