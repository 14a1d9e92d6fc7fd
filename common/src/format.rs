use chrono::{DateTime, NaiveDateTime};

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human readable size in binary units, e.g. `1.5 MB`. At most two decimals
/// are shown and trailing zeros are dropped.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    let rounded = (scaled * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text} {}", UNITS[unit])
}

/// Renders a backend timestamp as `Jan 5, 2025, 03:04 PM`.
///
/// Accepts RFC 3339 (shown in its own offset) and naive ISO timestamps with
/// or without fractional seconds. Anything else is returned as given.
pub fn format_date(raw: &str) -> String {
    const PATTERN: &str = "%b %-d, %Y, %I:%M %p";

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(PATTERN).to_string();
    }
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, layout) {
            return parsed.format(PATTERN).to_string();
        }
    }
    raw.to_string()
}

/// `format_date` for optional fields; `-` when absent.
pub fn format_optional_date(raw: Option<&str>) -> String {
    raw.map(format_date).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_use_binary_units() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(50 * 1024 * 1024), "50 MB");
        assert_eq!(format_bytes(1_234_567), "1.18 MB");
    }

    #[test]
    fn dates_render_in_short_form() {
        assert_eq!(format_date("2025-01-05T15:04:09.123456"), "Jan 5, 2025, 03:04 PM");
        assert_eq!(format_date("2025-01-05T09:30:00Z"), "Jan 5, 2025, 09:30 AM");
        assert_eq!(format_date("yesterday"), "yesterday");
        assert_eq!(format_optional_date(None), "-");
    }
}
