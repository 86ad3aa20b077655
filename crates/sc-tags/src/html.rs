//! HTML attribute building and escaping.

/// Ordered HTML attribute list rendered as `key="value" key="value"`.
///
/// Empty values are dropped by [`push`](Self::push); use
/// [`push_always`](Self::push_always) for attributes that must be present even
/// when empty, such as `alt`. Values are escaped on render.
///
/// # Example
///
/// ```
/// use sc_tags::HtmlAttributes;
///
/// let mut attrs = HtmlAttributes::new();
/// attrs.push("title", "Home").push("class", "").push_always("alt", "");
/// assert_eq!(attrs.render(), r#"title="Home" alt="""#);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HtmlAttributes {
    entries: Vec<(String, String)>,
}

impl HtmlAttributes {
    /// Create an empty attribute list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute unless its value is empty.
    pub fn push(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if !value.is_empty() {
            self.entries.push((name.to_owned(), value));
        }
        self
    }

    /// Append an attribute even when its value is empty.
    pub fn push_always(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.entries.push((name.to_owned(), value.into()));
        self
    }

    /// Whether no attribute was kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as space separated `key="value"` pairs.
    #[must_use]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!(r#"{name}="{}""#, escape_html(value)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Render `<name` followed by the attributes, without the closing `>`.
///
/// The separating space is only emitted when there are attributes.
pub(crate) fn open_tag(name: &str, leading: &str, attrs: &HtmlAttributes) -> String {
    let mut html = format!("<{name} {leading}");
    if !attrs.is_empty() {
        html.push(' ');
        html.push_str(&attrs.render());
    }
    html
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
