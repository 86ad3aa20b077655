//! `[date]`: current date formatted with strftime.
//!
//! ```text
//! [date]                         locale default format (%x)
//! [date "%A, %d. %B %Y" locale=de_DE]
//! [date format=%Y-%m-%d]
//! ```

use std::fmt::Write;

use chrono::Locale;
use chrono::format::{Item, StrftimeItems};
use sc_engine::{Attributes, HandlerResult};

use crate::{TagEnv, TagError, TagSettings};

pub(super) fn render(
    attrs: &Attributes,
    env: &dyn TagEnv,
    settings: &TagSettings,
) -> HandlerResult {
    let format = attrs
        .value("format", 0)
        .filter(|f| !f.is_empty())
        .unwrap_or(&settings.date_format);
    let locale = match attrs
        .get("locale")
        .filter(|l| !l.is_empty())
        .or(settings.date_locale.as_deref())
    {
        Some(name) => parse_locale(name)?,
        None => Locale::POSIX,
    };

    let items = StrftimeItems::new_with_locale(format, locale);
    if items.clone().any(|item| matches!(item, Item::Error)) {
        return Err(TagError::InvalidDateFormat(format.to_owned()).into());
    }

    let mut output = String::new();
    write!(output, "{}", env.now().format_localized_with_items(items, locale))
        .map_err(|_| TagError::InvalidDateFormat(format.to_owned()))?;
    Ok(Some(output))
}

/// Parse a locale name such as `de_DE`, `de-DE` or `de_DE.UTF-8`.
fn parse_locale(name: &str) -> Result<Locale, TagError> {
    let base = name.split(['.', '@']).next().unwrap_or_default().replace('-', "_");
    if base == "C" {
        return Ok(Locale::POSIX);
    }
    Locale::try_from(base.as_str()).map_err(|_| TagError::UnknownLocale(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestEnv;
    use pretty_assertions::assert_eq;

    fn date(raw: &str) -> HandlerResult {
        render(&Attributes::parse(raw), &TestEnv::new(), &TestEnv::settings())
    }

    #[test]
    fn test_default_format() {
        assert_eq!(date("").unwrap().as_deref(), Some("03/05/24"));
    }

    #[test]
    fn test_positional_format() {
        assert_eq!(date(r#""%Y-%m-%d""#).unwrap().as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_named_format_wins() {
        assert_eq!(date("%d format=%Y").unwrap().as_deref(), Some("2024"));
    }

    #[test]
    fn test_localized_names() {
        assert_eq!(
            date(r#""%A %B" locale=de_DE"#).unwrap().as_deref(),
            Some("Dienstag März")
        );
        assert_eq!(
            date(r#""%A" locale=fr_FR.UTF-8"#).unwrap().as_deref(),
            Some("mardi")
        );
    }

    #[test]
    fn test_settings_locale_used_by_default() {
        let settings = TagSettings {
            date_locale: Some("de_DE".to_owned()),
            ..TestEnv::settings()
        };
        let output = render(&Attributes::parse("%A"), &TestEnv::new(), &settings).unwrap();
        assert_eq!(output.as_deref(), Some("Dienstag"));
    }

    #[test]
    fn test_unknown_locale() {
        let err = date("locale=xx_YY").unwrap_err();
        assert_eq!(err.to_string(), "unknown locale `xx_YY`");
    }

    #[test]
    fn test_invalid_format() {
        let err = date("%Q").unwrap_err();
        assert_eq!(err.to_string(), "invalid date format `%Q`");
    }

    #[test]
    fn test_parse_locale_variants() {
        assert_eq!(parse_locale("de-DE").unwrap(), Locale::de_DE);
        assert_eq!(parse_locale("C").unwrap(), Locale::POSIX);
    }
}
