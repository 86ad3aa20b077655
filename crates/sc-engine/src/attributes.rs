//! Shortcode attribute parsing.
//!
//! Parses the attribute list of an opening tag: `[name /about text="About us" 'x']`.

use std::fmt;

/// Key of a single shortcode attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrKey {
    /// Bare token, numbered from 0 in occurrence order.
    Index(usize),
    /// `key=value` token.
    Name(String),
}

impl fmt::Display for AttrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Parsed attributes of a shortcode, in source order.
///
/// Positional and named attributes share one ordered list. Assigning a named
/// key twice keeps the first position and the last value.
///
/// # Example
///
/// ```
/// use sc_engine::Attributes;
///
/// let attrs = Attributes::parse(r#"/about text="About us" class=nav"#);
/// assert_eq!(attrs.positional(0), Some("/about"));
/// assert_eq!(attrs.get("text"), Some("About us"));
/// assert_eq!(attrs.value("href", 0), Some("/about"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(AttrKey, String)>,
}

impl Attributes {
    /// Create an empty attribute list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw attribute string (the part between the tag name and `]`).
    ///
    /// Never fails: an unterminated quote runs to the end of the string and
    /// stray characters become positional values.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut attrs = Self::new();
        let mut next_index = 0;
        let mut remaining = raw.trim_start();

        while !remaining.is_empty() {
            if let Some((key, value, rest)) = parse_named(remaining) {
                attrs.insert(AttrKey::Name(key.to_owned()), value);
                remaining = rest;
            } else {
                let (value, rest) = parse_value(remaining);
                attrs.insert(AttrKey::Index(next_index), value);
                next_index += 1;
                remaining = rest;
            }
            remaining = remaining.trim_start();
        }

        attrs
    }

    /// Insert or overwrite an attribute.
    pub fn insert(&mut self, key: AttrKey, value: impl Into<String>) {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Get a named attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find_map(|(key, value)| match key {
            AttrKey::Name(n) if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Get a positional attribute.
    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.entries.iter().find_map(|(key, value)| match key {
            AttrKey::Index(i) if *i == index => Some(value.as_str()),
            _ => None,
        })
    }

    /// Get a named attribute, falling back to a positional one.
    ///
    /// `[link /about]` and `[link href=/about]` both answer `value("href", 0)`.
    #[must_use]
    pub fn value(&self, name: &str, index: usize) -> Option<&str> {
        self.get(name).or_else(|| self.positional(index))
    }

    /// Get a named attribute or a default.
    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Whether a named attribute is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over all attributes in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&AttrKey, &str)> {
        self.entries.iter().map(|(key, value)| (key, value.as_str()))
    }

    /// Iterate over named attributes in source order.
    pub fn named(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(key, value)| match key {
            AttrKey::Name(name) => Some((name.as_str(), value.as_str())),
            AttrKey::Index(_) => None,
        })
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return a copy with `defaults` appended for every key not already set.
    #[must_use]
    pub fn with_defaults(&self, defaults: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in &defaults.entries {
            if !merged.entries.iter().any(|(k, _)| k == key) {
                merged.entries.push((key.clone(), value.clone()));
            }
        }
        merged
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (key, value) in iter {
            attrs.insert(AttrKey::Name(key.into()), value);
        }
        attrs
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Parse `key=value`, `key="value"` or `key = 'value'`.
///
/// Whitespace after `=` is only skipped when a quoted value follows, so
/// `alt= class=x` yields an empty `alt` and a separate `class`.
fn parse_named(s: &str) -> Option<(&str, String, &str)> {
    let key_len = s.find(|c: char| !is_key_char(c)).unwrap_or(s.len());
    if key_len == 0 {
        return None;
    }

    let key = &s[..key_len];
    let after_eq = s[key_len..].trim_start().strip_prefix('=')?;

    let trimmed = after_eq.trim_start();
    if trimmed.starts_with(['"', '\'']) {
        let (value, rest) = parse_quoted(trimmed);
        return Some((key, value, rest));
    }
    if after_eq.is_empty() || after_eq.starts_with(char::is_whitespace) {
        return Some((key, String::new(), after_eq));
    }

    let (value, rest) = parse_bare(after_eq);
    Some((key, value.to_owned(), rest))
}

/// Parse a positional value: quoted or bare.
fn parse_value(s: &str) -> (String, &str) {
    if s.starts_with(['"', '\'']) {
        parse_quoted(s)
    } else {
        let (value, rest) = parse_bare(s);
        (value.to_owned(), rest)
    }
}

fn parse_bare(s: &str) -> (&str, &str) {
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    (&s[..end], &s[end..])
}

/// Parse a quoted value starting at the opening quote.
///
/// `\<quote>` and `\\` unescape; an unterminated quote runs to the end.
fn parse_quoted(s: &str) -> (String, &str) {
    let mut chars = s.char_indices().peekable();
    let Some((_, quote)) = chars.next() else {
        return (String::new(), s);
    };

    let mut value = String::new();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            if let Some((_, escaped)) = chars.next_if(|&(_, n)| n == quote || n == '\\') {
                value.push(escaped);
            } else {
                value.push(c);
            }
        } else if c == quote {
            return (value, &s[i + c.len_utf8()..]);
        } else {
            value.push(c);
        }
    }

    (value, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty() {
        let attrs = Attributes::parse("");
        assert!(attrs.is_empty());
        assert_eq!(attrs.positional(0), None);
    }

    #[test]
    fn test_whitespace_only() {
        assert!(Attributes::parse("   \t ").is_empty());
    }

    #[test]
    fn test_positional_tokens() {
        let attrs = Attributes::parse("first second  third");
        assert_eq!(attrs.positional(0), Some("first"));
        assert_eq!(attrs.positional(1), Some("second"));
        assert_eq!(attrs.positional(2), Some("third"));
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_path_is_positional() {
        let attrs = Attributes::parse("/about text=Home");
        assert_eq!(attrs.positional(0), Some("/about"));
        assert_eq!(attrs.get("text"), Some("Home"));
    }

    #[test]
    fn test_named_only() {
        let attrs = Attributes::parse(r#"href=/about text="About us""#);
        assert_eq!(attrs.get("href"), Some("/about"));
        assert_eq!(attrs.get("text"), Some("About us"));
        assert_eq!(attrs.positional(0), None);
    }

    #[test]
    fn test_single_quoted() {
        let attrs = Attributes::parse("title='Hello World'");
        assert_eq!(attrs.get("title"), Some("Hello World"));
    }

    #[test]
    fn test_quoted_positional() {
        let attrs = Attributes::parse(r#""my file.pdf" 'second one'"#);
        assert_eq!(attrs.positional(0), Some("my file.pdf"));
        assert_eq!(attrs.positional(1), Some("second one"));
    }

    #[test]
    fn test_escaped_quotes() {
        let attrs = Attributes::parse(r#"text="say \"hi\"" alt='it\'s' path="C:\\dir""#);
        assert_eq!(attrs.get("text"), Some(r#"say "hi""#));
        assert_eq!(attrs.get("alt"), Some("it's"));
        assert_eq!(attrs.get("path"), Some(r"C:\dir"));
    }

    #[test]
    fn test_other_backslashes_kept() {
        let attrs = Attributes::parse(r#"format="%d\n""#);
        assert_eq!(attrs.get("format"), Some(r"%d\n"));
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let attrs = Attributes::parse(r#"text="About us class=x"#);
        assert_eq!(attrs.get("text"), Some("About us class=x"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_whitespace_around_equals_for_quoted_value() {
        let attrs = Attributes::parse(r#"title = "Hi there""#);
        assert_eq!(attrs.get("title"), Some("Hi there"));
    }

    #[test]
    fn test_empty_value_does_not_swallow_next_token() {
        let attrs = Attributes::parse("alt= class=x");
        assert_eq!(attrs.get("alt"), Some(""));
        assert_eq!(attrs.get("class"), Some("x"));
    }

    #[test]
    fn test_empty_quoted_value() {
        let attrs = Attributes::parse(r#"alt="""#);
        assert_eq!(attrs.get("alt"), Some(""));
    }

    #[test]
    fn test_value_containing_equals() {
        let attrs = Attributes::parse("href=/search?q=rust");
        assert_eq!(attrs.get("href"), Some("/search?q=rust"));
    }

    #[test]
    fn test_leading_equals_is_positional() {
        let attrs = Attributes::parse("=x");
        assert_eq!(attrs.positional(0), Some("=x"));
    }

    #[test]
    fn test_dotted_key() {
        let attrs = Attributes::parse(".title");
        assert_eq!(attrs.positional(0), Some(".title"));

        let attrs = Attributes::parse("data.id=7");
        assert_eq!(attrs.get("data.id"), Some("7"));
    }

    #[test]
    fn test_repeated_key_last_wins_first_position() {
        let attrs = Attributes::parse("class=a x class=b");
        assert_eq!(attrs.get("class"), Some("b"));
        let keys: Vec<String> = attrs.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["class", "0"]);
    }

    #[test]
    fn test_mixed_order_preserved() {
        let attrs = Attributes::parse("a b=2 c d=4");
        let pairs: Vec<(String, &str)> = attrs.iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert_eq!(
            pairs,
            vec![
                ("0".to_owned(), "a"),
                ("b".to_owned(), "2"),
                ("1".to_owned(), "c"),
                ("d".to_owned(), "4"),
            ]
        );
    }

    #[test]
    fn test_value_prefers_named() {
        let attrs = Attributes::parse("first href=second");
        assert_eq!(attrs.value("href", 0), Some("second"));
        assert_eq!(attrs.value("missing", 0), Some("first"));
        assert_eq!(attrs.value("missing", 1), None);
    }

    #[test]
    fn test_get_or() {
        let attrs = Attributes::parse("join=,");
        assert_eq!(attrs.get_or("join", " "), ",");
        assert_eq!(attrs.get_or("other", " "), " ");
    }

    #[test]
    fn test_named_iter_skips_positional() {
        let attrs = Attributes::parse("x a=1 y b=2");
        let named: Vec<_> = attrs.named().collect();
        assert_eq!(named, vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_with_defaults_fills_missing_only() {
        let attrs = Attributes::parse("format=%Y");
        let defaults: Attributes = [("format", "%x"), ("locale", "de_DE")].into_iter().collect();
        let merged = attrs.with_defaults(&defaults);
        assert_eq!(merged.get("format"), Some("%Y"));
        assert_eq!(merged.get("locale"), Some("de_DE"));
    }

    #[test]
    fn test_unicode_values() {
        let attrs = Attributes::parse("title=\"Grüße aus Köln\" ünï");
        assert_eq!(attrs.get("title"), Some("Grüße aus Köln"));
        assert_eq!(attrs.positional(0), Some("ünï"));
    }
}
