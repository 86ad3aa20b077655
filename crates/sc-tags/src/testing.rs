//! In-memory host for tag tests.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use sc_engine::HandlerError;
use serde_json::{Map, Value};

use crate::{
    FieldSource, FieldValue, FileInspector, MenuItem, MenuList, MenuProvider, TagEnv,
    TagSettings, TemplateRenderer, UrlGenerator,
};

/// Host with fixed fields, a fixed clock and echoing templates.
///
/// Templates render as `template <path> <params as JSON>` and inline sources
/// as `string <source>`; the template `missing.twig` fails.
pub(crate) struct TestEnv {
    page: BTreeMap<String, FieldValue>,
    site: BTreeMap<String, FieldValue>,
    page_number: usize,
}

impl TestEnv {
    pub(crate) fn new() -> Self {
        let mut page = BTreeMap::new();
        page.insert("title".to_owned(), FieldValue::from("Home"));
        page.insert(
            "tags".to_owned(),
            FieldValue::from(vec!["rust".to_owned(), "web".to_owned()]),
        );

        let mut site = BTreeMap::new();
        site.insert("title".to_owned(), FieldValue::from("Example Site"));

        Self {
            page,
            site,
            page_number: 1,
        }
    }

    pub(crate) fn with_page_number(mut self, page_number: usize) -> Self {
        self.page_number = page_number;
        self
    }

    pub(crate) fn settings() -> TagSettings {
        TagSettings {
            web_url: "https://example.com/".to_owned(),
            ..TagSettings::default()
        }
    }
}

impl TemplateRenderer for TestEnv {
    fn render_template(
        &self,
        path: &str,
        params: &Map<String, Value>,
    ) -> Result<String, HandlerError> {
        if path == "missing.twig" {
            return Err(format!("template `{path}` not found").into());
        }
        Ok(format!("template {path} {}", Value::Object(params.clone())))
    }

    fn render_string(&self, source: &str) -> Result<String, HandlerError> {
        Ok(format!("string {source}"))
    }
}

impl UrlGenerator for TestEnv {
    fn generate(&self, route: &str) -> String {
        format!("/site/{}", route.trim_start_matches('/'))
    }
}

impl MenuProvider for TestEnv {
    fn menu_list(&self) -> MenuList {
        vec![
            MenuItem::new("/")
                .with_field("title", "Home")
                .with_field("category", "page"),
            MenuItem::new("/news/rust")
                .with_field("title", "Rust news")
                .with_field("category", "news"),
            MenuItem::new("/drafts").with_field("title", ""),
            MenuItem::new("/news/php")
                .with_field("title", "PHP news")
                .with_field("category", "news"),
            MenuItem::new("/assets"),
            MenuItem::new("/about").with_field("title", "About"),
        ]
        .into()
    }
}

impl FileInspector for TestEnv {
    fn file_size(&self, path: &str) -> Option<u64> {
        match path {
            "docs/manual.pdf" => Some(2048),
            "LICENSE" => Some(512),
            _ => None,
        }
    }
}

impl TagEnv for TestEnv {
    fn page(&self) -> &dyn FieldSource {
        &self.page
    }

    fn site(&self) -> &dyn FieldSource {
        &self.site
    }

    fn templates(&self) -> &dyn TemplateRenderer {
        self
    }

    fn urls(&self) -> &dyn UrlGenerator {
        self
    }

    fn menu(&self) -> &dyn MenuProvider {
        self
    }

    fn files(&self) -> &dyn FileInspector {
        self
    }

    fn now(&self) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-05T09:30:00+01:00").unwrap()
    }

    fn page_number(&self) -> usize {
        self.page_number
    }
}
