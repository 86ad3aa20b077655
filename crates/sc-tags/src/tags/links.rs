//! `[link]`, `[email]` and `[tel]`: anchors.

use sc_engine::Attributes;

use crate::TagEnv;
use crate::html::{HtmlAttributes, escape_html, open_tag};

/// `[link /about text="About us" title=.. class=.. target=..]`
///
/// Hrefs not starting with `http` are internal routes and go through the URL
/// generator. The text defaults to the final href.
pub(super) fn link(attrs: &Attributes, env: &dyn TagEnv) -> String {
    let href = attrs.value("href", 0).unwrap_or_default();
    let href = if href.starts_with("http") {
        href.to_owned()
    } else {
        env.urls().generate(href)
    };

    let mut html = HtmlAttributes::new();
    html.push("title", attrs.get_or("title", ""))
        .push("class", attrs.get_or("class", ""))
        .push("target", attrs.get_or("target", ""));

    anchor(&href, &html, text_or(attrs, &href))
}

/// `[email info@example.com text="Write us"]`
pub(super) fn email(attrs: &Attributes) -> String {
    let address = attrs.value("address", 0).unwrap_or_default();
    let html = title_and_class(attrs);
    anchor(&format!("mailto:{address}"), &html, text_or(attrs, address))
}

/// `[tel "+41 44 123 45 67"]`: the href drops all whitespace.
pub(super) fn tel(attrs: &Attributes) -> String {
    let number = attrs.value("number", 0).unwrap_or_default();
    let dial: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    let html = title_and_class(attrs);
    anchor(&format!("tel:{dial}"), &html, text_or(attrs, number))
}

pub(super) fn title_and_class(attrs: &Attributes) -> HtmlAttributes {
    let mut html = HtmlAttributes::new();
    html.push("title", attrs.get_or("title", ""))
        .push("class", attrs.get_or("class", ""));
    html
}

/// `text` attribute, or `fallback` when it is missing or empty.
pub(super) fn text_or<'a>(attrs: &'a Attributes, fallback: &'a str) -> &'a str {
    attrs.get("text").filter(|t| !t.is_empty()).unwrap_or(fallback)
}

pub(super) fn anchor(href: &str, attrs: &HtmlAttributes, text: &str) -> String {
    let open = open_tag("a", &format!(r#"href="{}""#, escape_html(href)), attrs);
    format!("{open}>{text}</a>")
}
