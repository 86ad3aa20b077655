//! Built-in tags and their registration.

mod date;
mod fields;
mod links;
mod listing;
mod media;
mod render;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use sc_engine::{Attributes, HandlerResult, ShortcodeError};

use crate::{TagConfigError, TagEngine, TagEnv, TagTemplate};

/// Settings shared by the built-in tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSettings {
    /// Public base URL prefixed to relative image sources.
    pub web_url: String,
    /// Default strftime format of `[date]`.
    ///
    /// Default: `%x`
    pub date_format: String,
    /// Default locale of `[date]`, e.g. `de_DE`. `None` uses POSIX names.
    pub date_locale: Option<String>,
    /// Default template of `[listing]`.
    ///
    /// Default: `@widget/listing.twig`
    pub listing_template: String,
    /// Default page size of `[listing]`.
    ///
    /// Default: 10
    pub listing_limit: usize,
}

impl Default for TagSettings {
    fn default() -> Self {
        Self {
            web_url: String::new(),
            date_format: "%x".to_owned(),
            date_locale: None,
            listing_template: "@widget/listing.twig".to_owned(),
            listing_limit: 10,
        }
    }
}

/// Identifier of a built-in tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Date,
    Page,
    Site,
    Include,
    Twig,
    Link,
    Email,
    Tel,
    Image,
    File,
    Listing,
}

impl Builtin {
    /// All built-in tags in registration order.
    pub const ALL: [Self; 11] = [
        Self::Date,
        Self::Page,
        Self::Site,
        Self::Include,
        Self::Twig,
        Self::Link,
        Self::Email,
        Self::Tel,
        Self::Image,
        Self::File,
        Self::Listing,
    ];

    /// Tag name the built-in is registered under.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Page => "page",
            Self::Site => "site",
            Self::Include => "include",
            Self::Twig => "twig",
            Self::Link => "link",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Image => "image",
            Self::File => "file",
            Self::Listing => "listing",
        }
    }

    /// Render one occurrence of this tag.
    pub fn render(
        self,
        attrs: &Attributes,
        content: Option<&str>,
        env: &dyn TagEnv,
        settings: &TagSettings,
    ) -> HandlerResult {
        match self {
            Self::Date => date::render(attrs, env, settings),
            Self::Page => Ok(fields::render(attrs, env.page())),
            Self::Site => Ok(fields::render(attrs, env.site())),
            Self::Include => render::include(attrs, env),
            Self::Twig => render::twig(content, env),
            Self::Link => Ok(Some(links::link(attrs, env))),
            Self::Email => Ok(Some(links::email(attrs))),
            Self::Tel => Ok(Some(links::tel(attrs))),
            Self::Image => Ok(Some(media::image(attrs, settings))),
            Self::File => Ok(Some(media::file(attrs, env))),
            Self::Listing => listing::render(attrs, env, settings),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Builtin {
    type Err = TagConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|builtin| builtin.name() == s)
            .ok_or_else(|| TagConfigError::UnknownBuiltin(s.to_owned()))
    }
}

/// Register every built-in tag under its own name.
pub fn register_builtins(
    engine: &mut TagEngine,
    settings: &Arc<TagSettings>,
) -> Result<(), ShortcodeError> {
    for builtin in Builtin::ALL {
        let settings = Arc::clone(settings);
        engine.register(builtin.name(), move |attrs, content, env| {
            builtin.render(attrs, content, env, &settings)
        })?;
    }
    Ok(())
}

/// Register `name` as a built-in tag with default attributes.
///
/// Attributes given at the call site win over `defaults`.
pub fn register_alias(
    engine: &mut TagEngine,
    name: &str,
    builtin: Builtin,
    defaults: Attributes,
    settings: &Arc<TagSettings>,
) -> Result<(), ShortcodeError> {
    let settings = Arc::clone(settings);
    tracing::debug!(tag = name, builtin = %builtin, "Registering alias");
    engine.register(name, move |attrs, content, env| {
        builtin.render(&attrs.with_defaults(&defaults), content, env, &settings)
    })
}

/// Register `name` as a placeholder template tag.
pub fn register_template(
    engine: &mut TagEngine,
    name: &str,
    template: TagTemplate,
) -> Result<(), ShortcodeError> {
    tracing::debug!(tag = name, "Registering template tag");
    engine.register(name, move |attrs, content, _env| {
        Ok(Some(template.render(attrs, content)))
    })
}

/// Interpret a boolean-ish attribute: `1`, `true`, `yes` and `on` are set.
fn flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}
