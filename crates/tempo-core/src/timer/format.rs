//! Countdown rendering helpers.

/// Shown instead of `0:00` when there is nothing to count down.
pub const PLACEHOLDER: &str = "--:--";

/// Render seconds as `m:ss`; minutes are not padded and may exceed 59.
pub fn format_countdown(remaining_secs: u64) -> String {
    if remaining_secs == 0 {
        return PLACEHOLDER.to_string();
    }
    format!("{}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

/// 0.0 ..= 100.0 elapsed share of a session. Zero when `total_secs` is 0.
pub fn progress_pct(total_secs: u64, remaining_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    let elapsed = total_secs.saturating_sub(remaining_secs);
    elapsed as f64 / total_secs as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_seconds() {
        assert_eq!(format_countdown(1500), "25:00");
        assert_eq!(format_countdown(119), "1:59");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(9), "0:09");
    }

    #[test]
    fn zero_renders_placeholder() {
        assert_eq!(format_countdown(0), "--:--");
    }

    #[test]
    fn progress_bounds() {
        assert_eq!(progress_pct(0, 0), 0.0);
        assert_eq!(progress_pct(120, 120), 0.0);
        assert_eq!(progress_pct(120, 60), 50.0);
        assert_eq!(progress_pct(120, 0), 100.0);
    }
}
