//! Human readable file sizes.

const UNITS: [&str; 6] = ["Bytes", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count as `<n><unit>` with no decimals.
///
/// The unit is picked from the number of decimal digits, not the magnitude in
/// binary units: every three digits step up one unit, dividing by 1024.
///
/// ```
/// use sc_tags::human_filesize;
///
/// assert_eq!(human_filesize(512), "512Bytes");
/// assert_eq!(human_filesize(2048), "2KB");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)] // Sizes are rounded to whole units
pub fn human_filesize(bytes: u64) -> String {
    let digits = bytes.to_string().len();
    let factor = ((digits - 1) / 3).min(UNITS.len() - 1);

    let mut scaled = bytes as f64;
    for _ in 0..factor {
        scaled /= 1024.0;
    }
    format!("{}{}", scaled.round(), UNITS[factor])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes() {
        assert_eq!(human_filesize(0), "0Bytes");
        assert_eq!(human_filesize(999), "999Bytes");
    }

    #[test]
    fn test_four_digits_switch_to_kilobytes() {
        assert_eq!(human_filesize(1000), "1KB");
        assert_eq!(human_filesize(1023), "1KB");
        assert_eq!(human_filesize(1536), "2KB");
    }

    #[test]
    fn test_larger_units() {
        assert_eq!(human_filesize(5 * 1024 * 1024), "5MB");
        assert_eq!(human_filesize(3 * 1024 * 1024 * 1024), "3GB");
    }

    #[test]
    fn test_caps_at_petabytes() {
        assert_eq!(human_filesize(u64::MAX), "16384PB");
    }
}
