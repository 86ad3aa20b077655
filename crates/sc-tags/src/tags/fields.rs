//! `[page]` and `[site]`: field values of the current page or the site.
//!
//! `[page title]`, `[site .title]`, `[page tags join=", "]`.

use sc_engine::Attributes;

use crate::FieldSource;

/// Look up the field named by positional 0.
///
/// Leading dots are ignored. List fields are joined with `join` (default `" "`).
/// Missing fields render nothing.
pub(super) fn render(attrs: &Attributes, source: &dyn FieldSource) -> Option<String> {
    let name = attrs.positional(0)?.trim_start_matches('.');
    if name.is_empty() {
        return None;
    }

    let delimiter = attrs.get("join").filter(|d| !d.is_empty()).unwrap_or(" ");
    source.field(name).map(|value| value.join(delimiter))
}
