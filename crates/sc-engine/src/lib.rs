//! Shortcode parsing and dispatch engine.
//!
//! Expands `[name attrs]` and `[name attrs]content[/name]` markers in text by
//! calling a handler registered per tag name and splicing its output back in.
//!
//! # Syntax
//!
//! - **Self-closing**: `[date]`, `[date format="%Y"/]`. An opening tag without
//!   a matching `[/name]` is treated as self-closing.
//! - **Paired**: `[twig]{{ page.title }}[/twig]`. Enclosed content is expanded
//!   first, so nested tags are evaluated innermost-first. Same-name nesting is
//!   balanced; tags of other names do not affect close matching.
//! - **Attributes**: bare tokens are positional (`0`, `1`, ...), `key=value`
//!   tokens are named; values may be quoted with `"` or `'`.
//! - **Escaping**: `[[date]]` renders as the literal text `[date]`.
//!
//! Unknown tags, unterminated opening tags and stray close markers are copied
//! through unchanged. Only a failing handler aborts a `parse` call.
//!
//! # Example
//!
//! ```
//! use sc_engine::ShortcodeEngine;
//!
//! let mut engine = ShortcodeEngine::new();
//! engine
//!     .register("b", |_attrs, content, _ctx: &()| {
//!         Ok(content.map(|text| format!("<strong>{text}</strong>")))
//!     })
//!     .unwrap();
//!
//! let output = engine.parse("a [b]bold[/b] word, [unknown] tag", &()).unwrap();
//! assert_eq!(output, "a <strong>bold</strong> word, [unknown] tag");
//! ```

mod attributes;
mod engine;
mod error;
mod handler;
mod parser;

pub use attributes::{AttrKey, Attributes};
pub use engine::{EngineConfig, ErrorPolicy, ShortcodeEngine};
pub use error::{HandlerError, HandlerResult, ShortcodeError};
pub use handler::ShortcodeHandler;
pub use parser::{ParsedTag, is_valid_tag_name};
