//! Utility functions for formatting and filename handling.

/// Characters that never survive into an output filename.
const ILLEGAL_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strips characters that are illegal in filenames and trims surrounding
/// whitespace. Control characters are dropped as well.
///
/// Distinct titles can sanitize to the same string; no disambiguation is
/// attempted here.
#[must_use]
pub fn sanitize_filename(title: &str) -> String {
    title
        .chars()
        .filter(|c| !ILLEGAL_FILENAME_CHARS.contains(c) && !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Formats seconds as HH:MM:SS (e.g. 3725.0 -> "01:02:05"). Returns
/// "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        let sanitized = sanitize_filename("Chapter: \"One\"/Two?");
        assert!(!sanitized.is_empty());
        for c in ILLEGAL_FILENAME_CHARS {
            assert!(!sanitized.contains(*c), "found illegal char {c:?}");
        }
        assert_eq!(sanitized, sanitized.trim());
        assert_eq!(sanitized, "Chapter OneTwo");
    }

    #[test]
    fn test_sanitize_filename_trims_and_keeps_ordinary_text() {
        assert_eq!(sanitize_filename("  12. The End  "), "12. The End");
        assert_eq!(sanitize_filename("Émile Zola - Germinal"), "Émile Zola - Germinal");
        assert_eq!(sanitize_filename("a\tb\nc"), "abc");
    }

    #[test]
    fn test_sanitize_filename_can_empty_out() {
        assert_eq!(sanitize_filename("???"), "");
        assert_eq!(sanitize_filename("   "), "");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(59.9), "00:00:59");
        assert_eq!(format_duration(3661.0), "01:01:01");
        assert_eq!(format_duration(90061.0), "25:01:01");
        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::NAN), "??:??:??");
    }
}
