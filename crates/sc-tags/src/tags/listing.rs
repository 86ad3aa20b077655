//! `[listing]`: paginated page list rendered through a template.
//!
//! ```text
//! [listing filter=category|news sort=date|desc limit=5]
//! [listing path=@widget/cards.twig shuffle=1 pagination=false]
//! ```

use sc_engine::{Attributes, HandlerResult};
use serde_json::Map;

use crate::{MenuList, Pagination, SortDirection, TagEnv, TagError, TagSettings};

pub(super) fn render(
    attrs: &Attributes,
    env: &dyn TagEnv,
    settings: &TagSettings,
) -> HandlerResult {
    let path = non_empty(attrs.get("path")).unwrap_or(&settings.listing_template);
    let limit = match non_empty(attrs.get("limit")) {
        Some(limit) => limit.trim().parse::<usize>().map_err(|_| TagError::InvalidOption {
            option: "limit",
            value: limit.to_owned(),
            expected: "a non-negative integer",
        })?,
        None => settings.listing_limit,
    };
    let page = if attrs.get("pagination").is_none_or(|v| super::flag(Some(v))) {
        env.page_number()
    } else {
        1
    };

    let list = select(attrs, env.menu().menu_list())?;
    let pagination = Pagination::new(list, limit, page);
    tracing::debug!(
        template = path,
        total = pagination.total,
        page = pagination.page,
        "Rendering listing"
    );

    let mut params = Map::new();
    params.insert("pagination".to_owned(), serde_json::to_value(&pagination)?);
    env.templates().render_template(path, &params).map(Some)
}

/// Apply `filter`, `sort` and `shuffle`, then drop pages without a title.
fn select(attrs: &Attributes, mut list: MenuList) -> Result<MenuList, TagError> {
    if let Some(filter) = non_empty(attrs.get("filter")) {
        let (field, value) = filter.split_once('|').ok_or_else(|| TagError::InvalidOption {
            option: "filter",
            value: filter.to_owned(),
            expected: "`field|value`",
        })?;
        list = list.filter_by(field.trim(), value.trim());
    }

    if let Some(sort) = non_empty(attrs.get("sort")) {
        let (field, direction) = sort.split_once('|').unwrap_or((sort, ""));
        list = list.sort_by(field.trim(), direction.parse::<SortDirection>()?);
    }

    if super::flag(attrs.get("shuffle")) {
        list = list.shuffle();
    }

    Ok(list.filter(|item| item.field("title").is_some_and(|title| !title.is_empty())))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
