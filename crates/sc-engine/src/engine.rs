//! Shortcode registry and substitution.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::parser::{ParsedTag, Scanner, is_valid_tag_name};
use crate::{Attributes, HandlerResult, ShortcodeError, ShortcodeHandler};

/// What to do when a handler returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the whole `parse` call with [`ShortcodeError::Handler`].
    #[default]
    Propagate,
    /// Log the error and leave the tag's source text in place.
    Isolate,
}

/// Configuration for the shortcode engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum nesting depth at which enclosed content is still expanded.
    ///
    /// Content of tags nested deeper is handed to the handler unexpanded.
    /// `0` passes all content raw.
    ///
    /// Default: 10
    pub max_depth: usize,
    /// Handler error policy.
    ///
    /// Default: [`ErrorPolicy::Propagate`]
    pub on_error: ErrorPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: 10,
            on_error: ErrorPolicy::Propagate,
        }
    }

    /// Set the maximum content nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the handler error policy.
    #[must_use]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }
}

/// Shortcode registry and parser.
///
/// The engine is built in two phases: handlers are registered through
/// `&mut self`, then any number of [`parse`](Self::parse) calls run through
/// `&self`. Share a registered engine across threads with `Arc`.
///
/// `C` is the host context handed to every handler. It may be unsized, so an
/// engine over `dyn Trait` accepts any host implementing the trait.
///
/// # Example
///
/// ```
/// use sc_engine::ShortcodeEngine;
///
/// let mut engine = ShortcodeEngine::new();
/// engine
///     .register("date", |_attrs, _content, _ctx: &()| Ok(Some("2024-01-01".to_owned())))
///     .unwrap();
///
/// let output = engine.parse("Today is [date].", &()).unwrap();
/// assert_eq!(output, "Today is 2024-01-01.");
/// ```
pub struct ShortcodeEngine<C: ?Sized = ()> {
    config: EngineConfig,
    handlers: HashMap<String, Arc<dyn ShortcodeHandler<C>>>,
    /// Tag names in first-registration order.
    order: Vec<String>,
}

impl<C: ?Sized> fmt::Debug for ShortcodeEngine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcodeEngine")
            .field("config", &self.config)
            .field("tags", &self.order)
            .finish_non_exhaustive()
    }
}

impl<C: ?Sized> Default for ShortcodeEngine<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> ShortcodeEngine<C> {
    /// Create an empty engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty engine with custom configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            handlers: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a closure handler. Re-registering a name replaces its handler.
    pub fn register<F>(&mut self, tag: &str, handler: F) -> Result<(), ShortcodeError>
    where
        F: Fn(&Attributes, Option<&str>, &C) -> HandlerResult + Send + Sync + 'static,
    {
        self.register_handler(tag, handler)
    }

    /// Register a handler value. Re-registering a name replaces its handler.
    pub fn register_handler<H>(&mut self, tag: &str, handler: H) -> Result<(), ShortcodeError>
    where
        H: ShortcodeHandler<C> + 'static,
    {
        self.register_shared(tag, Arc::new(handler))
    }

    /// Register a shared handler, e.g. one already registered under another name.
    pub fn register_shared(
        &mut self,
        tag: &str,
        handler: Arc<dyn ShortcodeHandler<C>>,
    ) -> Result<(), ShortcodeError> {
        if !is_valid_tag_name(tag) {
            return Err(ShortcodeError::InvalidTagName(tag.to_owned()));
        }

        if self.handlers.insert(tag.to_owned(), handler).is_some() {
            tracing::debug!(tag, "Replaced shortcode handler");
        } else {
            self.order.push(tag.to_owned());
        }
        Ok(())
    }

    /// Get the handler registered for a tag.
    #[must_use]
    pub fn handler(&self, tag: &str) -> Option<Arc<dyn ShortcodeHandler<C>>> {
        self.handlers.get(tag).map(Arc::clone)
    }

    /// Whether a tag is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    /// Registered tag names in registration order.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Locate the top-level occurrences of registered tags in `text`.
    ///
    /// Escaped (`[[tag]]`) occurrences and tags enclosed in another match are
    /// not listed.
    #[must_use]
    pub fn find_tags<'a>(&self, text: &'a str) -> Vec<ParsedTag<'a>> {
        let is_registered = |name: &str| self.handlers.contains_key(name);
        let mut scanner = Scanner::new(text);
        let mut found = Vec::new();
        let mut pos = 0;

        while let Some(offset) = text[pos..].find('[') {
            let start = pos + offset;

            if let Some((_, inner_end)) = scanner.escaped(start, is_registered) {
                pos = inner_end + 1;
                continue;
            }

            if let Some(tag) = scanner.locate(start, is_registered) {
                pos = tag.end;
                found.push(tag);
            } else {
                pos = start + 1;
            }
        }

        found
    }

    /// Expand all registered shortcodes in `text`.
    ///
    /// Unknown tags, unterminated opening tags and stray close markers are
    /// copied through unchanged. Handler output is never re-scanned.
    ///
    /// # Errors
    ///
    /// Returns [`ShortcodeError::Handler`] when a handler fails and the error
    /// policy is [`ErrorPolicy::Propagate`].
    pub fn parse(&self, text: &str, ctx: &C) -> Result<String, ShortcodeError> {
        self.parse_at_depth(text, ctx, 0)
    }

    fn parse_at_depth(&self, text: &str, ctx: &C, depth: usize) -> Result<String, ShortcodeError> {
        let mut output = String::with_capacity(text.len());
        let mut copied = 0;
        let mut pos = 0;
        let is_registered = |name: &str| self.handlers.contains_key(name);
        let mut scanner = Scanner::new(text);

        while let Some(offset) = text[pos..].find('[') {
            let start = pos + offset;

            // `[[tag]]` escapes a shortcode: emit it without the outer brackets.
            if let Some((inner_start, inner_end)) = scanner.escaped(start, is_registered) {
                output.push_str(&text[copied..start]);
                output.push_str(&text[inner_start..inner_end]);
                copied = inner_end + 1;
                pos = copied;
                continue;
            }

            let Some(tag) = scanner.locate(start, is_registered) else {
                pos = start + 1;
                continue;
            };

            output.push_str(&text[copied..tag.start]);
            output.push_str(&self.dispatch(text, &tag, ctx, depth)?);
            copied = tag.end;
            pos = tag.end;
        }

        output.push_str(&text[copied..]);
        Ok(output)
    }

    fn dispatch(
        &self,
        text: &str,
        tag: &ParsedTag<'_>,
        ctx: &C,
        depth: usize,
    ) -> Result<String, ShortcodeError> {
        let Some(handler) = self.handlers.get(tag.name) else {
            return Ok(text[tag.start..tag.end].to_owned());
        };

        let attrs = Attributes::parse(tag.attrs);
        let content = match tag.content(text) {
            Some(raw) if depth < self.config.max_depth => {
                Some(Cow::Owned(self.parse_at_depth(raw, ctx, depth + 1)?))
            }
            Some(raw) => {
                tracing::warn!(
                    tag = tag.name,
                    max_depth = self.config.max_depth,
                    "Shortcode nesting too deep, passing content unexpanded"
                );
                Some(Cow::Borrowed(raw))
            }
            None => None,
        };

        tracing::trace!(tag = tag.name, paired = content.is_some(), "Dispatching shortcode");

        match handler.render(&attrs, content.as_deref(), ctx) {
            Ok(replacement) => Ok(replacement.unwrap_or_default()),
            Err(source) => match self.config.on_error {
                ErrorPolicy::Propagate => Err(ShortcodeError::Handler {
                    tag: tag.name.to_owned(),
                    source,
                }),
                ErrorPolicy::Isolate => {
                    tracing::warn!(tag = tag.name, error = %source, "Shortcode handler failed");
                    Ok(text[tag.start..tag.end].to_owned())
                }
            },
        }
    }
}
