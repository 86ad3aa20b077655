//! File-backed host for the built-in tags.
//!
//! Pages come from the configured source directory, templates are rendered
//! with minijinja from the templates directory, and URLs are built under the
//! site's `web_url`.

use std::path::{Path, PathBuf};

use minijinja::{Environment, context, path_loader};
use sc_config::{Config, FieldSetting};
use sc_engine::HandlerError;
use sc_tags::{
    FieldSource, FieldValue, FileInspector, MenuItem, MenuList, MenuProvider, TagEnv,
    TemplateRenderer, UrlGenerator,
};
use serde_json::{Map, Value};

use crate::frontmatter::{self, Fields};

/// Host backed by the local file system.
pub(crate) struct FileHost {
    page: Fields,
    site: Fields,
    templates: Environment<'static>,
    web_url: String,
    menu: MenuList,
    /// Directory relative file paths resolve against.
    base_dir: PathBuf,
    page_number: usize,
}

impl FileHost {
    /// Create a host for one page.
    ///
    /// Scans the configured source directory for the menu.
    pub(crate) fn new(config: &Config, page: Fields, base_dir: PathBuf) -> Self {
        let mut templates = Environment::new();
        templates.set_loader(path_loader(&config.paths_resolved.templates_dir));

        Self {
            page,
            site: site_fields(config),
            templates,
            web_url: config.site.web_url.clone(),
            menu: scan_pages(&config.paths_resolved.source_dir),
            base_dir,
            page_number: 1,
        }
    }

    /// Select the listing page to render.
    pub(crate) fn with_page_number(mut self, page_number: usize) -> Self {
        self.page_number = page_number;
        self
    }
}

fn site_fields(config: &Config) -> Fields {
    config
        .site_fields()
        .into_iter()
        .map(|(name, setting)| {
            let value = match setting {
                FieldSetting::Text(text) => FieldValue::Text(text),
                FieldSetting::List(items) => FieldValue::List(items),
            };
            (name, value)
        })
        .collect()
}

/// Collect `*.md` pages under `source_dir` as menu items, sorted by route.
///
/// Unreadable files and invalid front matter are skipped with a warning.
fn scan_pages(source_dir: &Path) -> MenuList {
    let pattern = format!(
        "{}/**/*.md",
        glob::Pattern::escape(&source_dir.to_string_lossy())
    );
    let Ok(paths) = glob::glob(&pattern) else {
        tracing::warn!(dir = %source_dir.display(), "Invalid source directory pattern");
        return MenuList::default();
    };

    let mut items: Vec<MenuItem> = paths
        .filter_map(Result::ok)
        .filter_map(|path| {
            let source = std::fs::read_to_string(&path)
                .inspect_err(|e| {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping page");
                })
                .ok()?;
            let fields = match frontmatter::parse_document(&source) {
                Ok((fields, _)) => fields,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Invalid front matter");
                    Fields::new()
                }
            };
            let route = page_route(source_dir, &path)?;
            Some(MenuItem {
                path: route,
                fields,
            })
        })
        .collect();

    items.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(dir = %source_dir.display(), pages = items.len(), "Scanned pages");
    items.into()
}

/// Route of a page file: `blog/post.md` → `/blog/post`, `blog/index.md` → `/blog`.
fn page_route(source_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(source_dir).ok()?.with_extension("");
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if segments.last().is_some_and(|last| last == "index") {
        segments.pop();
    }
    Some(format!("/{}", segments.join("/")))
}

/// Template name for a path; a leading `@` namespace marker is dropped.
fn template_name(path: &str) -> &str {
    path.strip_prefix('@').unwrap_or(path)
}

impl TemplateRenderer for FileHost {
    fn render_template(
        &self,
        path: &str,
        params: &Map<String, Value>,
    ) -> Result<String, HandlerError> {
        let template = self.templates.get_template(template_name(path))?;
        Ok(template.render(params)?)
    }

    fn render_string(&self, source: &str) -> Result<String, HandlerError> {
        let ctx = context! { page => &self.page, site => &self.site };
        Ok(self.templates.render_str(source, ctx)?)
    }
}

impl UrlGenerator for FileHost {
    fn generate(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.web_url.trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }
}

impl MenuProvider for FileHost {
    fn menu_list(&self) -> MenuList {
        self.menu.clone()
    }
}

impl FileInspector for FileHost {
    /// Size of a regular file inside the base directory.
    ///
    /// Paths escaping the base directory (e.g. `../../etc/passwd`) are treated
    /// as unreadable.
    fn file_size(&self, path: &str) -> Option<u64> {
        let canonical = self.base_dir.join(path).canonicalize().ok()?;
        let canonical_base = self.base_dir.canonicalize().ok()?;
        if !canonical.starts_with(&canonical_base) {
            return None;
        }
        let metadata = std::fs::metadata(&canonical).ok()?;
        metadata.is_file().then_some(metadata.len())
    }
}

impl TagEnv for FileHost {
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

    fn page_number(&self) -> usize {
        self.page_number
    }
}
