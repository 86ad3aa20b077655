//! Built-in shortcode tags.
//!
//! Provides the standard tag set for [`sc_engine`]: `date`, `page`, `site`,
//! `include`, `twig`, `link`, `email`, `tel`, `image`, `file` and `listing`.
//! Tags reach the host (page fields, templates, URLs, menu, files) through the
//! [`TagEnv`] trait, so one registered [`TagEngine`] serves any host.
//!
//! Besides the built-ins, tags can be declared from configuration either as an
//! alias of a built-in with default attributes ([`register_alias`]) or as a
//! placeholder template ([`register_template`]).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use sc_tags::{TagEngine, TagSettings, register_builtins};
//!
//! let mut engine = TagEngine::new();
//! register_builtins(&mut engine, &Arc::new(TagSettings::default()))?;
//!
//! // `host` implements `TagEnv`
//! let html = engine.parse("[link /about text=About] [email info@example.com]", &host)?;
//! ```

mod env;
mod error;
mod filesize;
mod html;
mod menu;
mod tags;
mod template;
#[cfg(test)]
mod testing;

use sc_engine::ShortcodeEngine;

pub use env::{
    FieldSource, FieldValue, FileInspector, MenuProvider, TagEnv, TemplateRenderer, UrlGenerator,
};
pub use error::{TagConfigError, TagError, TemplateError};
pub use filesize::human_filesize;
pub use html::{HtmlAttributes, escape_html};
pub use menu::{MenuItem, MenuList, Pagination, SortDirection};
pub use tags::{Builtin, TagSettings, register_alias, register_builtins, register_template};
pub use template::TagTemplate;

/// Shortcode engine whose handlers receive a [`TagEnv`] host.
pub type TagEngine = ShortcodeEngine<dyn TagEnv>;
