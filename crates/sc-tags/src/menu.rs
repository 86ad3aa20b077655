//! Page lists for the `listing` tag.

use std::collections::BTreeMap;
use std::str::FromStr;

use rand::seq::SliceRandom;
use serde::Serialize;

use crate::TagError;
use crate::env::FieldValue;

/// A page in the site menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// Route of the page.
    pub path: String,
    /// Front matter fields (`title`, `date`, `tags`, ...).
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl MenuItem {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Set a field, returning the item.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    fn sort_key(&self, name: &str) -> String {
        self.field(name)
            .map(|value| value.join(" "))
            .unwrap_or_default()
    }
}

/// Sort direction for [`MenuList::sort_by`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(TagError::InvalidOption {
                option: "sort direction",
                value: s.to_owned(),
                expected: "`asc` or `desc`",
            }),
        }
    }
}

/// Ordered list of menu items.
///
/// All operations consume the list and return the transformed one, so they
/// chain:
///
/// ```
/// use sc_tags::{MenuItem, MenuList, SortDirection};
///
/// let list: MenuList = vec![
///     MenuItem::new("/b").with_field("title", "B").with_field("category", "news"),
///     MenuItem::new("/a").with_field("title", "A").with_field("category", "news"),
///     MenuItem::new("/c").with_field("title", "C"),
/// ]
/// .into();
///
/// let news = list.filter_by("category", "news").sort_by("title", SortDirection::Asc);
/// let paths: Vec<_> = news.iter().map(|item| item.path.as_str()).collect();
/// assert_eq!(paths, ["/a", "/b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MenuList {
    items: Vec<MenuItem>,
}

impl MenuList {
    /// Keep items whose `field` equals `value` (or, for list fields, contains it).
    #[must_use]
    pub fn filter_by(self, field: &str, value: &str) -> Self {
        self.filter(|item| item.field(field).is_some_and(|v| v.matches(value)))
    }

    /// Keep items matching `predicate`.
    #[must_use]
    pub fn filter(mut self, predicate: impl Fn(&MenuItem) -> bool) -> Self {
        self.items.retain(predicate);
        self
    }

    /// Stable sort by the text of `field`; items without it sort first.
    #[must_use]
    pub fn sort_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.items.sort_by(|a, b| {
            let ordering = a.sort_key(field).cmp(&b.sort_key(field));
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        self
    }

    #[must_use]
    pub fn shuffle(mut self) -> Self {
        self.items.shuffle(&mut rand::rng());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<MenuItem>> for MenuList {
    fn from(items: Vec<MenuItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<MenuItem> for MenuList {
    fn from_iter<I: IntoIterator<Item = MenuItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// One page of a [`MenuList`], as handed to listing templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Items on the current page.
    pub items: Vec<MenuItem>,
    /// Current page, starting at 1.
    pub page: usize,
    /// Page size; `0` means everything fits on one page.
    pub limit: usize,
    /// Number of items across all pages.
    pub total: usize,
    pub page_count: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl Pagination {
    /// Slice `list` into pages of `limit` items and select `page`.
    ///
    /// `page` is clamped to the available range.
    #[must_use]
    pub fn new(list: MenuList, limit: usize, page: usize) -> Self {
        let total = list.len();
        let page_count = if limit == 0 {
            1
        } else {
            total.div_ceil(limit).max(1)
        };
        let page = page.clamp(1, page_count);

        let items = if limit == 0 {
            list.items
        } else {
            list.items
                .into_iter()
                .skip((page - 1) * limit)
                .take(limit)
                .collect()
        };

        Self {
            items,
            page,
            limit,
            total,
            page_count,
            has_prev: page > 1,
            has_next: page < page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pages(count: usize) -> MenuList {
        (1..=count)
            .map(|i| MenuItem::new(format!("/p{i}")).with_field("title", format!("Page {i}")))
            .collect()
    }

    fn paths(list: &MenuList) -> Vec<&str> {
        list.iter().map(|item| item.path.as_str()).collect()
    }

    #[test]
    fn test_filter_by_list_field() {
        let list: MenuList = vec![
            MenuItem::new("/a").with_field("tags", vec!["rust".to_owned(), "cli".to_owned()]),
            MenuItem::new("/b").with_field("tags", vec!["php".to_owned()]),
            MenuItem::new("/c"),
        ]
        .into();
        assert_eq!(paths(&list.filter_by("tags", "cli")), ["/a"]);
    }

    #[test]
    fn test_sort_desc() {
        let list = pages(3).sort_by("title", SortDirection::Desc);
        assert_eq!(paths(&list), ["/p3", "/p2", "/p1"]);
    }

    #[test]
    fn test_sort_missing_field_first() {
        let list: MenuList = vec![
            MenuItem::new("/dated").with_field("date", "2024-01-01"),
            MenuItem::new("/undated"),
        ]
        .into();
        assert_eq!(
            paths(&list.sort_by("date", SortDirection::Asc)),
            ["/undated", "/dated"]
        );
    }

    #[test]
    fn test_shuffle_keeps_items() {
        let list = pages(20).shuffle();
        let original = pages(20);
        let mut shuffled = paths(&list);
        let mut expected = paths(&original);
        shuffled.sort_unstable();
        expected.sort_unstable();
        assert_eq!(shuffled, expected);
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!("".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_pagination_middle_page() {
        let pagination = Pagination::new(pages(25), 10, 2);
        assert_eq!(pagination.items.len(), 10);
        assert_eq!(pagination.items[0].path, "/p11");
        assert_eq!(pagination.page_count, 3);
        assert!(pagination.has_prev);
        assert!(pagination.has_next);
    }

    #[test]
    fn test_pagination_clamps_page() {
        let pagination = Pagination::new(pages(5), 2, 99);
        assert_eq!(pagination.page, 3);
        assert_eq!(paths(&pagination.items.into_iter().collect()), ["/p5"]);
    }

    #[test]
    fn test_pagination_without_limit() {
        let pagination = Pagination::new(pages(5), 0, 4);
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.items.len(), 5);
        assert!(!pagination.has_next);
    }

    #[test]
    fn test_pagination_empty_list() {
        let pagination = Pagination::new(MenuList::default(), 10, 1);
        assert_eq!(pagination.page_count, 1);
        assert_eq!(pagination.total, 0);
        assert!(!pagination.has_prev);
    }

    #[test]
    fn test_menu_item_serializes_flat() {
        let item = MenuItem::new("/a").with_field("title", "A");
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            serde_json::json!({ "path": "/a", "title": "A" })
        );
    }
}
