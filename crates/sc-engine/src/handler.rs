//! Shortcode handler trait.

use crate::{Attributes, HandlerResult};

/// Handler for a shortcode: `[name attrs]` or `[name attrs]content[/name]`.
///
/// `content` is `None` for self-closing occurrences and the already expanded
/// enclosed text for paired ones. `ctx` is the host context passed to
/// [`ShortcodeEngine::parse`](crate::ShortcodeEngine::parse).
///
/// Closures with the matching signature implement this trait, so most handlers
/// are registered with [`ShortcodeEngine::register`](crate::ShortcodeEngine::register).
///
/// # Thread Safety
///
/// Handlers are `Send + Sync` because a registered engine serves concurrent
/// `parse` calls through `&self`. Handlers needing mutable state must bring
/// their own synchronization.
///
/// # Example
///
/// ```
/// use sc_engine::{Attributes, HandlerResult, ShortcodeEngine, ShortcodeHandler};
///
/// struct Kbd;
///
/// impl ShortcodeHandler<()> for Kbd {
///     fn render(&self, _attrs: &Attributes, content: Option<&str>, _ctx: &()) -> HandlerResult {
///         Ok(content.map(|keys| format!("<kbd>{keys}</kbd>")))
///     }
/// }
///
/// let mut engine = ShortcodeEngine::new();
/// engine.register_handler("kbd", Kbd).unwrap();
/// assert_eq!(engine.parse("[kbd]Ctrl+C[/kbd]", &()).unwrap(), "<kbd>Ctrl+C</kbd>");
/// ```
pub trait ShortcodeHandler<C: ?Sized>: Send + Sync {
    /// Render one tag occurrence.
    fn render(&self, attrs: &Attributes, content: Option<&str>, ctx: &C) -> HandlerResult;
}

impl<C, F> ShortcodeHandler<C> for F
where
    C: ?Sized,
    F: Fn(&Attributes, Option<&str>, &C) -> HandlerResult + Send + Sync,
{
    fn render(&self, attrs: &Attributes, content: Option<&str>, ctx: &C) -> HandlerResult {
        self(attrs, content, ctx)
    }
}
