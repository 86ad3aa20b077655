//! `sc render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use sc_config::Config;

use super::{ConfigArgs, read_input};
use crate::engine::build_engine;
use crate::error::CliError;
use crate::frontmatter::parse_document;
use crate::host::FileHost;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Document to render (default: stdin).
    file: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,

    /// Listing page to render.
    #[arg(long, default_value_t = 1)]
    page: usize,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, front matter or a tag handler fails.
    pub(crate) fn execute(self, output: &Output, verbose: bool) -> Result<(), CliError> {
        let config = self.config.load()?;
        if verbose {
            match &config.config_path {
                Some(path) => output.info(&format!("Config: {}", path.display())),
                None => output.info("Config: defaults (no sc.toml found)"),
            }
            output.info(&format!(
                "Source directory: {}",
                config.paths_resolved.source_dir.display()
            ));
        }

        let (source, base_dir) = read_input(self.file.as_deref())?;
        let rendered = render_document(&config, &source, base_dir, self.page, output)?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Expand the shortcodes in a document body; front matter becomes the page.
fn render_document(
    config: &Config,
    source: &str,
    base_dir: PathBuf,
    page_number: usize,
    output: &Output,
) -> Result<String, CliError> {
    let (page, body) = parse_document(source)?;
    let engine = build_engine(config, output)?;
    let host = FileHost::new(config, page, base_dir).with_page_number(page_number);

    let start = std::time::Instant::now();
    let rendered = engine.parse(body, &host)?;
    tracing::info!(elapsed_ms = start.elapsed().as_millis(), "Rendered document");
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sc_config::TagConfig;

    fn render(config: &Config, source: &str) -> Result<String, CliError> {
        let base_dir = std::env::temp_dir();
        render_document(config, source, base_dir, 1, &Output::new())
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.site.web_url = "https://example.com".to_owned();
        config.site.title = Some("Example".to_owned());
        config
    }

    #[test]
    fn test_front_matter_feeds_page_tag() {
        let source = "---\ntitle: Hello\n---\n# [page title]\n";
        assert_eq!(render(&config(), source).unwrap(), "# Hello\n");
    }

    #[test]
    fn test_site_and_link_tags() {
        let source = "[site title] [link /about text=About/]";
        assert_eq!(
            render(&config(), source).unwrap(),
            r#"Example <a href="https://example.com/about">About</a>"#
        );
    }

    #[test]
    fn test_configured_template_tag() {
        let mut config = config();
        config.tags.insert(
            "note".to_owned(),
            TagConfig {
                template: Some(r#"<div class="{0}">{content}</div>"#.to_owned()),
                ..TagConfig::default()
            },
        );
        assert_eq!(
            render(&config, "[note tip][page title][/note]").unwrap(),
            r#"<div class="tip"></div>"#
        );
    }

    #[test]
    fn test_invalid_front_matter() {
        let err = render(&config(), "---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, CliError::FrontMatter(_)));
    }

    #[test]
    fn test_unknown_tags_pass_through() {
        assert_eq!(
            render(&config(), "[unknown a=1] [[date]]").unwrap(),
            "[unknown a=1] [date]"
        );
    }
}
