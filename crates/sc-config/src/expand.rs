//! `${VAR}` and `${VAR:-default}` expansion in configuration strings.

use crate::ConfigError;

/// Variable that was referenced without a default but is not set.
struct Unset(String);

/// Expand `${VAR}` references in `value` in place.
///
/// `field` names the configuration key for error messages. Strings without
/// `${` are left untouched, so a literal `$` in a URL survives.
pub(crate) fn expand_in_place(value: &mut String, field: &str) -> Result<(), ConfigError> {
    if !value.contains("${") {
        return Ok(());
    }

    let expanded = shellexpand::env_with_context(value.as_str(), |var| {
        std::env::var(var)
            .map(Some)
            .map_err(|_| Unset(var.to_owned()))
    })
    .map_err(|err| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", err.cause.0),
    })?;

    *value = expanded.into_owned();
    Ok(())
}
