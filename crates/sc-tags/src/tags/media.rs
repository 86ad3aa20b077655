//! `[image]` and `[file]`.

use std::path::Path;

use sc_engine::Attributes;

use super::links::{anchor, text_or, title_and_class};
use crate::html::{HtmlAttributes, escape_html, open_tag};
use crate::{FileInspector, TagEnv, TagSettings, human_filesize};

/// `[image photo.jpg width=200 alt="A photo" caption="Summer"]`
///
/// Sources not starting with `http` are prefixed with the site's web URL.
/// `alt` is always emitted.
pub(super) fn image(attrs: &Attributes, settings: &TagSettings) -> String {
    let src = attrs.value("src", 0).unwrap_or_default();
    let src = if src.starts_with("http") {
        src.to_owned()
    } else {
        format!(
            "{}/{}",
            settings.web_url.trim_end_matches('/'),
            src.trim_start_matches('/')
        )
    };

    let mut html = HtmlAttributes::new();
    html.push("width", attrs.get_or("width", ""))
        .push("height", attrs.get_or("height", ""))
        .push_always("alt", attrs.get_or("alt", ""))
        .push("class", attrs.get_or("class", ""));

    let caption = attrs
        .get("caption")
        .filter(|c| !c.is_empty())
        .map(|c| format!("<figcaption>{c}</figcaption>"))
        .unwrap_or_default();

    let img = open_tag("img", &format!(r#"src="{}""#, escape_html(&src)), &html);
    format!("<figure>{img}>{caption}</figure>")
}

/// `[file docs/manual.pdf text=Manual info=1]`
///
/// With `info` set, a ` (EXT, size)` note follows the link when the file is
/// readable.
pub(super) fn file(attrs: &Attributes, env: &dyn TagEnv) -> String {
    let path = attrs.value("path", 0).unwrap_or_default();
    let html = title_and_class(attrs);
    let link = anchor(path, &html, text_or(attrs, path));

    let info = super::flag(attrs.get("info"))
        .then(|| file_info(env.files(), path))
        .flatten();
    match info {
        Some(info) => format!(r#"{link}<span class="file-info">{info}</span>"#),
        None => link,
    }
}

fn file_info(files: &dyn FileInspector, path: &str) -> Option<String> {
    let size = human_filesize(files.file_size(path)?);
    let extension = Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_uppercase())
        .filter(|ext| !ext.is_empty());

    Some(match extension {
        Some(extension) => format!(" ({extension}, {size})"),
        None => format!(" ({size})"),
    })
}
