//! Logging utilities for sanitizing user-entered text (quest titles, step text,
//! search queries) so logs stay single-line.

/// Escape a string for single-line logging:
/// - `\n` => `\\n`
/// - `\r` => `\\r`
/// - `\t` => `\\t`
/// - backslash => `\\\\`
///   Truncates strings longer than `MAX_PREVIEW` chars with an ellipsis.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 120;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Render a millisecond duration as `1h 05m` / `12m 30s` / `45s` for status output.
pub fn format_remaining(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_log, format_remaining};

    #[test]
    fn escapes_newlines_and_truncates() {
        let s = "Buy milk\nand eggs\r\tthen go";
        assert_eq!(escape_log(s), "Buy milk\\nand eggs\\r\\tthen go");
        let long = "x".repeat(500);
        let esc = escape_log(&long);
        assert!(esc.ends_with('…'));
        assert_eq!(esc.chars().count(), 121);
    }

    #[test]
    fn formats_remaining_time() {
        assert_eq!(format_remaining(3_900_000), "1h 05m");
        assert_eq!(format_remaining(750_000), "12m 30s");
        assert_eq!(format_remaining(45_000), "45s");
        assert_eq!(format_remaining(-10), "0s");
    }
}
