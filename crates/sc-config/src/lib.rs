//! Configuration management for the shortcode renderer.
//!
//! Parses `sc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.web_url`
//! - `site.title`
//! - `paths.source_dir`
//! - `paths.templates_dir`
//!
//! ## Example
//!
//! ```toml
//! [site]
//! web_url = "${SITE_URL:-http://localhost:8080}"
//! title = "My Site"
//!
//! [date]
//! locale = "de_DE"
//!
//! [tags.button]
//! alias = "link"
//! defaults = { class = "button" }
//!
//! [tags.note]
//! template = '<div class="note {0}">{content}</div>'
//! ```

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the public base URL.
    pub web_url: Option<String>,
    /// Override the default `[date]` locale.
    pub locale: Option<String>,
    /// Override the pages directory.
    pub source_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sc.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site metadata.
    pub site: SiteConfig,
    /// `[date]` tag defaults.
    pub date: DateConfig,
    /// `[listing]` tag defaults.
    pub listing: ListingConfig,
    /// Engine behavior.
    pub engine: EngineSection,
    /// Directories (relative strings from TOML).
    paths: PathsConfigRaw,
    /// Tags declared in configuration, by tag name.
    pub tags: BTreeMap<String, TagConfig>,

    /// Resolved directories (set after loading).
    #[serde(skip)]
    pub paths_resolved: PathsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site metadata, exposed to `[site]` tags.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public base URL, used for links and image sources.
    pub web_url: String,
    /// Site title, available as `[site title]`.
    pub title: Option<String>,
    /// Extra site fields.
    pub fields: BTreeMap<String, FieldSetting>,
}

/// A configured site field: a string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldSetting {
    Text(String),
    List(Vec<String>),
}

/// `[date]` defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    /// strftime format used when a tag gives none.
    pub format: String,
    /// Locale such as `de_DE`; unset uses POSIX names.
    pub locale: Option<String>,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            format: "%x".to_owned(),
            locale: None,
        }
    }
}

/// `[listing]` defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Template path used when a tag gives none.
    pub template: String,
    /// Page size used when a tag gives none.
    pub limit: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            template: "@widget/listing.twig".to_owned(),
            limit: 10,
        }
    }
}

/// Engine behavior.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Nesting depth up to which enclosed content is expanded.
    pub max_depth: usize,
    /// What to do when a tag fails.
    pub on_error: OnError,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            max_depth: 10,
            on_error: OnError::Propagate,
        }
    }
}

/// Handling of failing tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Abort rendering.
    #[default]
    Propagate,
    /// Log and keep the tag's source text.
    Isolate,
}

/// Raw paths configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PathsConfigRaw {
    source_dir: Option<String>,
    templates_dir: Option<String>,
}

/// Resolved directories with absolute paths.
#[derive(Debug, Default)]
pub struct PathsConfig {
    /// Markdown pages, listed by `[listing]`.
    pub source_dir: PathBuf,
    /// Templates for `[include]` and `[listing]`.
    pub templates_dir: PathBuf,
}

/// A tag declared in configuration.
///
/// Either an alias of a built-in tag with default attributes, or a
/// placeholder template. Exactly one of `alias` and `template` must be set.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagConfig {
    /// Built-in tag name.
    pub alias: Option<String>,
    /// Default attributes for the alias.
    pub defaults: BTreeMap<String, String>,
    /// Placeholder template (`{content}`, `{0}`, `{name}`).
    pub template: Option<String>,
}

impl TagConfig {
    /// Validate the tag declaration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` unless exactly one of `alias` and
    /// `template` is set, or if `defaults` accompany a template.
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !sc_engine::is_valid_tag_name(name) {
            return Err(ConfigError::Validation(format!(
                "tags.{name}: tag names may only contain letters, digits, '_' and '-'"
            )));
        }
        match (&self.alias, &self.template) {
            (Some(alias), None) => require_non_empty(alias, &format!("tags.{name}.alias")),
            (None, Some(template)) => {
                require_non_empty(template, &format!("tags.{name}.template"))?;
                if self.defaults.is_empty() {
                    Ok(())
                } else {
                    Err(ConfigError::Validation(format!(
                        "tags.{name}.defaults only apply to aliases"
                    )))
                }
            }
            (Some(_), Some(_)) => Err(ConfigError::Validation(format!(
                "tags.{name} cannot set both alias and template"
            ))),
            (None, None) => Err(ConfigError::Validation(format!(
                "tags.{name} requires alias or template"
            ))),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.web_url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(web_url) = &settings.web_url {
            self.site.web_url.clone_from(web_url);
        }
        if let Some(locale) = &settings.locale {
            self.date.locale = Some(locale.clone());
        }
        if let Some(source_dir) = &settings.source_dir {
            self.paths_resolved.source_dir.clone_from(source_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            date: DateConfig::default(),
            listing: ListingConfig::default(),
            engine: EngineSection::default(),
            paths: PathsConfigRaw::default(),
            tags: BTreeMap::new(),
            paths_resolved: PathsConfig {
                source_dir: base.join("pages"),
                templates_dir: base.join("templates"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.site.web_url.is_empty() {
            require_http_url(&self.site.web_url, "site.web_url")?;
        }
        require_non_empty(&self.date.format, "date.format")?;
        require_non_empty(&self.listing.template, "listing.template")?;
        for (name, tag) in &self.tags {
            tag.validate(name)?;
        }
        Ok(())
    }

    /// Site fields exposed to `[site]`, including `title` and `web_url`.
    #[must_use]
    pub fn site_fields(&self) -> BTreeMap<String, FieldSetting> {
        let mut fields = self.site.fields.clone();
        if let Some(title) = &self.site.title {
            fields.insert("title".to_owned(), FieldSetting::Text(title.clone()));
        }
        fields.insert(
            "web_url".to_owned(),
            FieldSetting::Text(self.site.web_url.clone()),
        );
        fields
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_in_place(&mut self.site.web_url, "site.web_url")?;
        if let Some(title) = &mut self.site.title {
            expand::expand_in_place(title, "site.title")?;
        }
        if let Some(dir) = &mut self.paths.source_dir {
            expand::expand_in_place(dir, "paths.source_dir")?;
        }
        if let Some(dir) = &mut self.paths.templates_dir {
            expand::expand_in_place(dir, "paths.templates_dir")?;
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths_resolved = PathsConfig {
            source_dir: resolve(self.paths.source_dir.as_deref(), "pages"),
            templates_dir: resolve(self.paths.templates_dir.as_deref(), "templates"),
        };
    }
}
