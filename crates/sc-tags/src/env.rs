//! Host capabilities consumed by the built-in tags.
//!
//! The host implements [`TagEnv`] once and passes it to
//! [`ShortcodeEngine::parse`](sc_engine::ShortcodeEngine::parse); every
//! built-in tag reaches its page, templates, URLs, menu and files through it.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, Local};
use sc_engine::HandlerError;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::menu::MenuList;

/// Value of a page or site field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Render the value, joining list items with `delimiter`.
    #[must_use]
    pub fn join(&self, delimiter: &str) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => items.join(delimiter),
        }
    }

    /// Whether the value is empty text or an empty list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// Whether the value equals `value` or, for lists, contains it.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Text(text) => text == value,
            Self::List(items) => items.iter().any(|item| item == value),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Named fields of a page or of the site.
pub trait FieldSource {
    /// Look up a field by name.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

impl FieldSource for BTreeMap<String, FieldValue> {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

impl FieldSource for HashMap<String, FieldValue> {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

/// Template rendering backend.
pub trait TemplateRenderer {
    /// Render the template at `path` with `params` as its variables.
    fn render_template(&self, path: &str, params: &Map<String, Value>)
    -> Result<String, HandlerError>;

    /// Render `source` as an inline template.
    fn render_string(&self, source: &str) -> Result<String, HandlerError>;
}

/// Maps an internal route to a public URL.
pub trait UrlGenerator {
    fn generate(&self, route: &str) -> String;
}

/// Source of the site's page list.
pub trait MenuProvider {
    /// All pages, in menu order.
    fn menu_list(&self) -> MenuList;
}

/// Read-only file metadata.
pub trait FileInspector {
    /// Size in bytes of the file at `path`, or `None` if it is not readable.
    fn file_size(&self, path: &str) -> Option<u64>;
}

/// Host context handed to every built-in tag.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
///
/// use sc_engine::HandlerError;
/// use sc_tags::{
///     FieldSource, FieldValue, FileInspector, MenuList, MenuProvider, TagEnv,
///     TemplateRenderer, UrlGenerator,
/// };
/// use serde_json::{Map, Value};
///
/// struct Host {
///     page: BTreeMap<String, FieldValue>,
/// }
///
/// impl TemplateRenderer for Host {
///     fn render_template(&self, path: &str, _: &Map<String, Value>) -> Result<String, HandlerError> {
///         Ok(format!("<!-- {path} -->"))
///     }
///     fn render_string(&self, source: &str) -> Result<String, HandlerError> {
///         Ok(source.to_owned())
///     }
/// }
///
/// impl UrlGenerator for Host {
///     fn generate(&self, route: &str) -> String {
///         format!("/site/{}", route.trim_start_matches('/'))
///     }
/// }
///
/// impl MenuProvider for Host {
///     fn menu_list(&self) -> MenuList {
///         MenuList::default()
///     }
/// }
///
/// impl FileInspector for Host {
///     fn file_size(&self, _: &str) -> Option<u64> {
///         None
///     }
/// }
///
/// impl TagEnv for Host {
///     fn page(&self) -> &dyn FieldSource { &self.page }
///     fn site(&self) -> &dyn FieldSource { &self.page }
///     fn templates(&self) -> &dyn TemplateRenderer { self }
///     fn urls(&self) -> &dyn UrlGenerator { self }
///     fn menu(&self) -> &dyn MenuProvider { self }
///     fn files(&self) -> &dyn FileInspector { self }
/// }
/// ```
pub trait TagEnv {
    /// Fields of the page being rendered.
    fn page(&self) -> &dyn FieldSource;

    /// Site-wide fields.
    fn site(&self) -> &dyn FieldSource;

    fn templates(&self) -> &dyn TemplateRenderer;

    fn urls(&self) -> &dyn UrlGenerator;

    fn menu(&self) -> &dyn MenuProvider;

    fn files(&self) -> &dyn FileInspector;

    /// Current time used by the `date` tag.
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    /// Requested listing page, starting at 1.
    fn page_number(&self) -> usize {
        1
    }
}
