//! Engine setup from configuration.

use std::sync::Arc;

use sc_config::{Config, OnError, TagConfig};
use sc_engine::{AttrKey, Attributes, EngineConfig, ErrorPolicy};
use sc_tags::{
    Builtin, TagConfigError, TagEngine, TagSettings, TagTemplate, register_alias,
    register_builtins, register_template,
};

use crate::error::CliError;
use crate::output::Output;

/// Build an engine with the built-in tags and the tags declared in config.
///
/// Configured tags are registered after the built-ins and replace a built-in
/// of the same name.
pub(crate) fn build_engine(config: &Config, output: &Output) -> Result<TagEngine, CliError> {
    let engine_config = EngineConfig::new()
        .with_max_depth(config.engine.max_depth)
        .with_error_policy(match config.engine.on_error {
            OnError::Propagate => ErrorPolicy::Propagate,
            OnError::Isolate => ErrorPolicy::Isolate,
        });
    let mut engine = TagEngine::with_config(engine_config);

    let settings = Arc::new(tag_settings(config));
    register_builtins(&mut engine, &settings)?;

    for (name, tag) in &config.tags {
        if engine.contains(name) {
            output.warning(&format!("tags.{name} replaces the built-in [{name}] tag"));
        }
        register_configured(&mut engine, name, tag, &settings)?;
    }

    tracing::info!(tags = engine.tags().len(), "Engine ready");
    Ok(engine)
}

fn register_configured(
    engine: &mut TagEngine,
    name: &str,
    tag: &TagConfig,
    settings: &Arc<TagSettings>,
) -> Result<(), TagConfigError> {
    if let Some(alias) = &tag.alias {
        let builtin: Builtin = alias.parse()?;
        register_alias(engine, name, builtin, defaults(tag), settings)?;
    } else if let Some(template) = &tag.template {
        let template = TagTemplate::compile(template).map_err(|source| TagConfigError::Template {
            tag: name.to_owned(),
            source,
        })?;
        register_template(engine, name, template)?;
    }
    Ok(())
}

/// Default attributes of an alias; numeric keys fill positional slots.
fn defaults(tag: &TagConfig) -> Attributes {
    let mut attrs = Attributes::new();
    for (key, value) in &tag.defaults {
        let key = key
            .parse::<usize>()
            .map_or_else(|_| AttrKey::Name(key.clone()), AttrKey::Index);
        attrs.insert(key, value.as_str());
    }
    attrs
}

fn tag_settings(config: &Config) -> TagSettings {
    TagSettings {
        web_url: config.site.web_url.clone(),
        date_format: config.date.format.clone(),
        date_locale: config.date.locale.clone(),
        listing_template: config.listing.template.clone(),
        listing_limit: config.listing.limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config_with_tags(tags: &[(&str, TagConfig)]) -> Config {
        let mut config = Config::default();
        config.site.web_url = "https://example.com".to_owned();
        for (name, tag) in tags {
            config.tags.insert(
                (*name).to_owned(),
                TagConfig {
                    alias: tag.alias.clone(),
                    defaults: tag.defaults.clone(),
                    template: tag.template.clone(),
                },
            );
        }
        config
    }

    #[test]
    fn test_builtins_registered() {
        let engine = build_engine(&Config::default(), &Output::new()).unwrap();
        assert_eq!(engine.tags().len(), Builtin::ALL.len());
        assert!(engine.contains("listing"));
    }

    #[test]
    fn test_configured_tags_follow_builtins() {
        let config = config_with_tags(&[
            (
                "button",
                TagConfig {
                    alias: Some("link".to_owned()),
                    ..TagConfig::default()
                },
            ),
            (
                "note",
                TagConfig {
                    template: Some("<aside>{content}</aside>".to_owned()),
                    ..TagConfig::default()
                },
            ),
        ]);
        let engine = build_engine(&config, &Output::new()).unwrap();
        assert_eq!(&engine.tags()[Builtin::ALL.len()..], ["button", "note"]);
    }

    #[test]
    fn test_unknown_alias_target() {
        let config = config_with_tags(&[(
            "x",
            TagConfig {
                alias: Some("blocks".to_owned()),
                ..TagConfig::default()
            },
        )]);
        let err = build_engine(&config, &Output::new()).unwrap_err();
        assert_eq!(err.to_string(), "unknown built-in tag `blocks`");
    }

    #[test]
    fn test_invalid_template() {
        let config = config_with_tags(&[(
            "x",
            TagConfig {
                template: Some("{content".to_owned()),
                ..TagConfig::default()
            },
        )]);
        let err = build_engine(&config, &Output::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid template for [x]: unclosed placeholder at offset 0"
        );
    }

    #[test]
    fn test_numeric_default_keys_are_positional() {
        let tag = TagConfig {
            alias: Some("image".to_owned()),
            defaults: [("0".to_owned(), "logo.png".to_owned())].into(),
            ..TagConfig::default()
        };
        let attrs = defaults(&tag);
        assert_eq!(attrs.positional(0), Some("logo.png"));
        assert_eq!(attrs.get("0"), None);
    }
}
