//! YAML front matter of page files.
//!
//! A page may start with a `---` fenced YAML block; its top-level keys become
//! page fields (`[page title]`) and the rest of the file is the body.

use std::collections::BTreeMap;

use sc_tags::FieldValue;
use serde_yaml::{Mapping, Value};

/// Page fields keyed by name.
pub(crate) type Fields = BTreeMap<String, FieldValue>;

/// Split a page into its front matter fields and body.
///
/// Pages without front matter yield no fields and the whole source as body.
///
/// # Errors
///
/// Returns an error if the front matter is not a YAML mapping.
pub(crate) fn parse_document(source: &str) -> Result<(Fields, &str), serde_yaml::Error> {
    let Some((yaml, body)) = split_front_matter(source) else {
        return Ok((Fields::new(), source));
    };

    if yaml.trim().is_empty() {
        return Ok((Fields::new(), body));
    }

    let mapping: Mapping = serde_yaml::from_str(yaml)?;
    let fields = mapping
        .into_iter()
        .filter_map(|(key, value)| Some((key.as_str()?.to_owned(), field_value(value)?)))
        .collect();
    Ok((fields, body))
}

/// Split `---\n<yaml>\n---\n<body>`; `None` when there is no closed fence.
fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let rest = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Convert a YAML value; mappings and nulls have no field representation.
fn field_value(value: Value) -> Option<FieldValue> {
    match value {
        Value::Sequence(items) => Some(FieldValue::List(
            items.into_iter().filter_map(scalar_text).collect(),
        )),
        other => scalar_text(other).map(FieldValue::Text),
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
