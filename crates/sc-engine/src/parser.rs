//! Shortcode syntax scanning.
//!
//! Locates `[name attrs]`, `[name attrs/]` and `[name attrs]content[/name]`
//! spans in source text. All offsets are byte offsets; every delimiter is ASCII,
//! so slicing at them always lands on a char boundary.

use std::collections::HashMap;

/// A shortcode occurrence located in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag<'a> {
    /// Tag name.
    pub name: &'a str,
    /// Raw attribute string, trimmed, without the self-closing `/`.
    pub attrs: &'a str,
    /// Whether the opening tag ends with `/]`.
    pub self_closing: bool,
    /// Offset of the opening `[`.
    pub start: usize,
    /// Offset just past the opening tag's `]`.
    pub open_end: usize,
    /// Offsets of the matching `[/name]` marker, for paired tags.
    pub close: Option<(usize, usize)>,
    /// Offset just past the whole span.
    pub end: usize,
}

impl<'a> ParsedTag<'a> {
    /// Text between the opening tag and the close marker, for paired tags.
    #[must_use]
    pub fn content(&self, source: &'a str) -> Option<&'a str> {
        self.close.map(|(close_start, _)| &source[self.open_end..close_start])
    }
}

/// An opening tag without its close marker resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenTag<'a> {
    name: &'a str,
    attrs: &'a str,
    self_closing: bool,
    start: usize,
    end: usize,
}

/// Whether `name` is a valid tag name: `[A-Za-z0-9_-]+`.
#[must_use]
pub fn is_valid_tag_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Tag locator over one text.
///
/// Close markers are matched once per tag name for the whole text, so texts
/// with many unpaired tags are scanned in linear time.
pub(crate) struct Scanner<'a> {
    text: &'a str,
    /// Per tag name: opening tag offset to its close marker, if any.
    closes: HashMap<&'a str, HashMap<usize, Option<(usize, usize)>>>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            closes: HashMap::new(),
        }
    }

    /// Locate a registered shortcode whose `[` sits at `start`.
    ///
    /// Returns `None` when the text at `start` is not a tag of a registered
    /// name, or when the opening tag is unterminated. An opening tag without a
    /// matching `[/name]` is returned as a self-closing occurrence.
    pub(crate) fn locate(
        &mut self,
        start: usize,
        is_registered: impl Fn(&str) -> bool,
    ) -> Option<ParsedTag<'a>> {
        let name = tag_name_at(self.text, start)?;
        if !is_registered(name) {
            return None;
        }

        let open = scan_open_tag(self.text, start)?;
        let close = if open.self_closing {
            None
        } else {
            self.close_of(&open)
        };

        Some(ParsedTag {
            name: open.name,
            attrs: open.attrs,
            self_closing: open.self_closing,
            start: open.start,
            open_end: open.end,
            close,
            end: close.map_or(open.end, |(_, close_end)| close_end),
        })
    }

    /// Span of the tag escaped by the `[[` at `start`, without the outer
    /// brackets.
    ///
    /// The self-closing reading `[[name]]` wins over a paired one, so a later
    /// `[/name]` does not defeat the escape.
    pub(crate) fn escaped(
        &mut self,
        start: usize,
        is_registered: impl Fn(&str) -> bool,
    ) -> Option<(usize, usize)> {
        let text = self.text;
        if !text.get(start..)?.starts_with("[[") {
            return None;
        }

        let name = tag_name_at(text, start + 1)?;
        if !is_registered(name) {
            return None;
        }
        let open = scan_open_tag(text, start + 1)?;
        if text[open.end..].starts_with(']') {
            return Some((open.start, open.end));
        }

        let tag = self.locate(start + 1, is_registered)?;
        text[tag.end..]
            .starts_with(']')
            .then_some((tag.start, tag.end))
    }

    fn close_of(&mut self, open: &OpenTag<'a>) -> Option<(usize, usize)> {
        let text = self.text;
        let closes = self
            .closes
            .entry(open.name)
            .or_insert_with(|| match_closes(text, open.name));
        match closes.get(&open.start) {
            Some(close) => *close,
            // Not reached by the forward scan, e.g. inside a quoted attribute.
            None => find_close(text, open.name, open.end),
        }
    }
}

/// Read the tag name following the `[` at `start`.
///
/// The name must be followed by whitespace, `/`, `]` or the end of text, so
/// `[date]` and `[date format=x]` match but `[date!]` does not.
fn tag_name_at(text: &str, start: usize) -> Option<&str> {
    let rest = text.get(start..)?.strip_prefix('[')?;
    let len = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
    if len == 0 {
        return None;
    }

    match rest[len..].chars().next() {
        None | Some('/' | ']') => Some(&rest[..len]),
        Some(c) if c.is_whitespace() => Some(&rest[..len]),
        Some(_) => None,
    }
}

fn scan_open_tag(text: &str, start: usize) -> Option<OpenTag<'_>> {
    let name = tag_name_at(text, start)?;
    let body_start = start + 1 + name.len();
    let close_bracket = find_tag_end(text, body_start)?;

    let body = text[body_start..close_bracket].trim();
    let (attrs, self_closing) = match body.strip_suffix('/') {
        Some(attrs) => (attrs.trim_end(), true),
        None => (body, false),
    };

    Some(OpenTag {
        name,
        attrs,
        self_closing,
        start,
        end: close_bracket + 1,
    })
}

/// Find the `]` closing an opening tag whose attribute list starts at `from`.
///
/// Quotes opening a value (at the start of the list, after whitespace or after
/// `=`) hide `]` until the matching unescaped quote, which must itself end the
/// token (followed by whitespace, `/`, `]` or the end of text). An unquoted `[`
/// makes the tag invalid. When a quote is never properly closed, the first `]`
/// of the attribute list ends the tag.
fn find_tag_end(text: &str, from: usize) -> Option<usize> {
    let body = &text[from..];
    let mut quote: Option<char> = None;
    let mut at_boundary = true;
    let mut chars = body.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                let ends_token = chars
                    .peek()
                    .is_none_or(|&(_, next)| next.is_whitespace() || matches!(next, '/' | ']'));
                if !ends_token {
                    return lenient_tag_end(body, from);
                }
                quote = None;
            }
            continue;
        }

        match c {
            ']' => return Some(from + i),
            '[' => return None,
            '"' | '\'' if at_boundary => quote = Some(c),
            _ => {}
        }
        at_boundary = c.is_whitespace() || c == '=';
    }

    if quote.is_some() {
        return lenient_tag_end(body, from);
    }
    None
}

/// First `]` of the attribute list, unless an unquoted reading would already
/// have rejected the tag at a `[`.
fn lenient_tag_end(body: &str, from: usize) -> Option<usize> {
    let end = body.find(']')?;
    (!body[..end].contains('[')).then_some(from + end)
}

/// Find the `[/name]` matching an opening tag that ends at `from`.
///
/// Same-name opening tags in between raise the nesting depth; tags with other
/// names are ignored.
fn find_close(text: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let close_marker_len = name.len() + 3;
    let mut depth = 1usize;
    let mut pos = from;

    while let Some(offset) = text[pos..].find('[') {
        let at = pos + offset;

        if is_close_marker(&text[at..], name) {
            depth -= 1;
            if depth == 0 {
                return Some((at, at + close_marker_len));
            }
            pos = at + close_marker_len;
            continue;
        }

        if tag_name_at(text, at) == Some(name)
            && let Some(inner) = scan_open_tag(text, at)
        {
            if !inner.self_closing {
                depth += 1;
            }
            pos = inner.end;
            continue;
        }

        pos = at + 1;
    }

    None
}

/// Pair every opening `name` tag in `text` with its close marker.
///
/// One forward scan with a stack of open tags; yields the same pairs as
/// [`find_close`] run from each opening tag. Unpaired opening tags map to
/// `None`.
fn match_closes(text: &str, name: &str) -> HashMap<usize, Option<(usize, usize)>> {
    let close_marker_len = name.len() + 3;
    let mut closes = HashMap::new();
    let mut open = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('[') {
        let at = pos + offset;

        if is_close_marker(&text[at..], name) {
            if let Some(start) = open.pop() {
                closes.insert(start, Some((at, at + close_marker_len)));
            }
            pos = at + close_marker_len;
            continue;
        }

        if tag_name_at(text, at) == Some(name)
            && let Some(tag) = scan_open_tag(text, at)
        {
            if tag.self_closing {
                closes.insert(at, None);
            } else {
                open.push(at);
            }
            pos = tag.end;
            continue;
        }

        pos = at + 1;
    }

    closes.extend(open.into_iter().map(|start| (start, None)));
    closes
}

fn is_close_marker(rest: &str, name: &str) -> bool {
    rest.strip_prefix("[/")
        .and_then(|r| r.strip_prefix(name))
        .is_some_and(|r| r.starts_with(']'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn any(_: &str) -> bool {
        true
    }

    fn locate<'a>(
        text: &'a str,
        start: usize,
        is_registered: impl Fn(&str) -> bool,
    ) -> Option<ParsedTag<'a>> {
        Scanner::new(text).locate(start, is_registered)
    }

    #[test]
    fn test_valid_tag_names() {
        assert!(is_valid_tag_name("date"));
        assert!(is_valid_tag_name("my_tag-2"));
        assert!(is_valid_tag_name("Upper"));
        assert!(!is_valid_tag_name(""));
        assert!(!is_valid_tag_name("two words"));
        assert!(!is_valid_tag_name("a.b"));
        assert!(!is_valid_tag_name("ünï"));
    }

    #[test]
    fn test_tag_name_terminators() {
        assert_eq!(tag_name_at("[date]", 0), Some("date"));
        assert_eq!(tag_name_at("[date x]", 0), Some("date"));
        assert_eq!(tag_name_at("[date/]", 0), Some("date"));
        assert_eq!(tag_name_at("[date", 0), Some("date"));
        assert_eq!(tag_name_at("[date!]", 0), None);
        assert_eq!(tag_name_at("[/date]", 0), None);
        assert_eq!(tag_name_at("[]", 0), None);
        assert_eq!(tag_name_at("date]", 0), None);
    }

    #[test]
    fn test_locate_self_closing_without_close() {
        let tag = locate("a [date] b", 2, any).unwrap();
        assert_eq!(tag.name, "date");
        assert_eq!(tag.attrs, "");
        assert!(!tag.self_closing);
        assert_eq!((tag.start, tag.open_end, tag.end), (2, 8, 8));
        assert_eq!(tag.close, None);
    }

    #[test]
    fn test_locate_explicit_self_closing() {
        let text = "[image a.png /][/image]";
        let tag = locate(text, 0, any).unwrap();
        assert!(tag.self_closing);
        assert_eq!(tag.attrs, "a.png");
        assert_eq!(tag.end, 15);
        assert_eq!(tag.content(text), None);
    }

    #[test]
    fn test_locate_paired() {
        let text = "[b x=1]bold[/b] tail";
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.attrs, "x=1");
        assert_eq!(tag.content(text), Some("bold"));
        assert_eq!(tag.close, Some((11, 15)));
        assert_eq!(tag.end, 15);
    }

    #[test]
    fn test_locate_unregistered() {
        assert_eq!(locate("[date]", 0, |name| name == "page"), None);
    }

    #[test]
    fn test_unterminated_open_tag() {
        assert_eq!(locate("[t attr=1", 0, any), None);
    }

    #[test]
    fn test_unquoted_bracket_invalidates_tag() {
        assert_eq!(locate("[date [page title]", 0, any), None);
    }

    #[test]
    fn test_quoted_bracket_is_hidden() {
        let text = r#"[link text="a ] b" /x]"#;
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.attrs, r#"text="a ] b" /x"#);
        assert_eq!(tag.end, text.len());
    }

    #[test]
    fn test_escaped_quote_inside_quoted_value() {
        let text = r#"[t v="a \" ] b"]"#;
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.end, text.len());
    }

    #[test]
    fn test_apostrophe_inside_word_is_not_a_quote() {
        let text = "[page it's] and more]";
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.attrs, "it's");
    }

    #[test]
    fn test_unterminated_quote_falls_back_to_first_bracket() {
        let text = r#"[link text="About] rest"#;
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.attrs, r#"text="About"#);
        assert_eq!(tag.open_end, 18);
    }

    #[test]
    fn test_same_name_nesting() {
        let text = "[t][t]inner[/t]outer[/t]";
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.content(text), Some("[t]inner[/t]outer"));
        assert_eq!(tag.end, text.len());
    }

    #[test]
    fn test_inner_self_closing_does_not_nest() {
        let text = "[t][t/]x[/t]";
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.content(text), Some("[t/]x"));
    }

    #[test]
    fn test_other_names_ignored_while_seeking_close() {
        let text = "[a][b]x[/a][/b]";
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.content(text), Some("[b]x"));
    }

    #[test]
    fn test_unbalanced_inner_open_leaves_outer_unmatched() {
        let text = "[t]a [t] b[/t]";
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.close, None);
        assert_eq!(tag.end, 3);
    }

    #[test]
    fn test_close_prefix_of_longer_name_ignored() {
        let text = "[t]x[/tt][/t]";
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.content(text), Some("x[/tt]"));
    }

    #[test]
    fn test_multibyte_content() {
        let text = "[t]Grüße ✓[/t]";
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.content(text), Some("Grüße ✓"));
    }

    #[test]
    fn test_quote_closed_inside_prose_falls_back_to_first_bracket() {
        let text = r#"[link /a text="About] He said "hi" there. [link /b text=B] end"#;
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.attrs, r#"/a text="About"#);
        assert_eq!(tag.end, 21);
    }

    #[test]
    fn test_quote_does_not_swallow_prose_up_to_later_bracket() {
        let text = r#"[link /a text="About] He said "hi" there.] tail"#;
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.attrs, r#"/a text="About"#);
        assert_eq!(&text[tag.end..], r#" He said "hi" there.] tail"#);
    }

    #[test]
    fn test_quoted_value_may_hold_a_tag() {
        let text = r#"[link /c text="Contact [site title]"] x"#;
        let tag = locate(text, 0, any).unwrap();
        assert_eq!(tag.attrs, r#"/c text="Contact [site title]""#);
    }

    #[test]
    fn test_trailing_slash_of_bare_value_marks_self_closing() {
        let tag = locate("[link /blog/]", 0, any).unwrap();
        assert!(tag.self_closing);
        assert_eq!(tag.attrs, "/blog");

        let quoted = locate(r#"[link "/blog/"]"#, 0, any).unwrap();
        assert!(!quoted.self_closing);
        assert_eq!(quoted.attrs, r#""/blog/""#);
    }

    #[test]
    fn test_scanner_pairs_later_tag_after_unmatched_one() {
        let text = "[t] [t]x[/t]";
        let mut scanner = Scanner::new(text);
        let first = scanner.locate(0, any).unwrap();
        assert_eq!(first.close, None);
        let second = scanner.locate(4, any).unwrap();
        assert_eq!(second.content(text), Some("x"));
    }

    #[test]
    fn test_scanner_agrees_with_direct_close_search() {
        let text = "[t][t/][t]a[/t] [t] b[/t][/t] [t][/tt] [t]";
        let mut scanner = Scanner::new(text);
        for (at, _) in text.match_indices("[t") {
            let Some(open) = scan_open_tag(text, at) else {
                continue;
            };
            if open.self_closing {
                continue;
            }
            let tag = scanner.locate(at, any).unwrap();
            assert_eq!(tag.close, find_close(text, "t", open.end), "tag at {at}");
        }
    }

    #[test]
    fn test_many_unpaired_tags() {
        let text = "word [t] ".repeat(20_000);
        let mut scanner = Scanner::new(&text);
        let mut pos = 0;
        let mut found = 0;
        while let Some(offset) = text[pos..].find('[') {
            let tag = scanner.locate(pos + offset, any).unwrap();
            assert_eq!(tag.close, None);
            found += 1;
            pos = tag.end;
        }
        assert_eq!(found, 20_000);
    }

    #[test]
    fn test_escaped_prefers_self_closing_reading() {
        let text = "[[t]] a [/t]";
        assert_eq!(Scanner::new(text).escaped(0, any), Some((1, 4)));
    }

    #[test]
    fn test_escaped_paired_tag() {
        let text = "[[t]x[/t]]";
        assert_eq!(Scanner::new(text).escaped(0, any), Some((1, 9)));
        assert_eq!(Scanner::new("[[t] x").escaped(0, any), None);
        assert_eq!(Scanner::new("[t]").escaped(0, any), None);
    }
}
