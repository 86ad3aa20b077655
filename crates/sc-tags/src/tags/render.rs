//! `[include]` and `[twig]`: delegate to the template renderer.

use sc_engine::{AttrKey, Attributes, HandlerResult};
use serde_json::{Map, Value};

use crate::TagEnv;

/// `[include path/to/template.twig key=value]`
///
/// The template path comes from `path` or positional 0; all other attributes
/// become template parameters.
pub(super) fn include(attrs: &Attributes, env: &dyn TagEnv) -> HandlerResult {
    let Some(path) = attrs.value("path", 0).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    let params: Map<String, Value> = attrs
        .iter()
        .filter(|(key, _)| !matches!(key, AttrKey::Index(0)))
        .filter(|(key, _)| !matches!(key, AttrKey::Name(name) if name == "path"))
        .map(|(key, value)| (key.to_string(), Value::String(value.to_owned())))
        .collect();

    tracing::debug!(template = path, params = params.len(), "Including template");
    env.templates().render_template(path, &params).map(Some)
}

/// `[twig]{{ page.title }}[/twig]`: render the content as an inline template.
pub(super) fn twig(content: Option<&str>, env: &dyn TagEnv) -> HandlerResult {
    content
        .map(|source| env.templates().render_string(source))
        .transpose()
}
