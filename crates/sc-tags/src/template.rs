//! Placeholder templates for configuration-declared tags.
//!
//! A template such as `<div class="note {0}">{content}</div>` is compiled once
//! at startup and rendered per occurrence by plain substitution:
//!
//! - `{content}` is the tag's (already expanded) content, empty when self-closing
//! - `{0}`, `{1}`, ... are positional attributes
//! - `{name}` is a named attribute
//! - `{{` and `}}` are literal braces
//!
//! Missing values render as the empty string.

use std::str::FromStr;

use sc_engine::Attributes;

use crate::TemplateError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Content,
    Positional(usize),
    Named(String),
}

/// Compiled placeholder template.
///
/// # Example
///
/// ```
/// use sc_engine::Attributes;
/// use sc_tags::TagTemplate;
///
/// let template = TagTemplate::compile(r#"<span class="{0}">{content}</span>"#).unwrap();
/// let attrs = Attributes::parse("badge");
/// assert_eq!(
///     template.render(&attrs, Some("new")),
///     r#"<span class="badge">new</span>"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTemplate {
    segments: Vec<Segment>,
}

impl TagTemplate {
    /// Compile a template, validating every placeholder.
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' if chars.next_if(|&(_, next)| next == '{').is_some() => text.push('{'),
                '}' if chars.next_if(|&(_, next)| next == '}').is_some() => text.push('}'),
                '}' => return Err(TemplateError::UnmatchedClose(offset)),
                '{' => {
                    let rest = &source[offset + 1..];
                    let len = rest.find('}').ok_or(TemplateError::Unclosed(offset))?;
                    let placeholder = placeholder(rest[..len].trim(), offset)?;

                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(placeholder);

                    let close = offset + 1 + len;
                    while chars.next_if(|&(i, _)| i <= close).is_some() {}
                }
                _ => text.push(c),
            }
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Ok(Self { segments })
    }

    /// Substitute attributes and content into the template.
    #[must_use]
    pub fn render(&self, attrs: &Attributes, content: Option<&str>) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            let value = match segment {
                Segment::Text(text) => Some(text.as_str()),
                Segment::Content => content,
                Segment::Positional(index) => attrs.positional(*index),
                Segment::Named(name) => attrs.get(name),
            };
            output.push_str(value.unwrap_or_default());
        }
        output
    }
}

impl FromStr for TagTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

fn placeholder(name: &str, offset: usize) -> Result<Segment, TemplateError> {
    if name.is_empty() {
        return Err(TemplateError::Empty(offset));
    }
    if name == "content" {
        return Ok(Segment::Content);
    }
    if let Ok(index) = name.parse::<usize>() {
        return Ok(Segment::Positional(index));
    }
    if name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Ok(Segment::Named(name.to_owned()));
    }
    Err(TemplateError::InvalidName {
        name: name.to_owned(),
        offset,
    })
}
