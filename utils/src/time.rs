//! Duration formatting helpers.

use farm_types::SECONDS_PER_PERIOD;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Seconds left until `elapsed_secs` crosses the next full accrual period.
pub fn time_to_next_period(elapsed_secs: u64) -> u64 {
    SECONDS_PER_PERIOD - elapsed_secs % SECONDS_PER_PERIOD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_magnitude() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(7_260), "2h 1m");
        assert_eq!(format_duration(90_000), "1d 1h");
    }

    #[test]
    fn next_period_countdown() {
        assert_eq!(time_to_next_period(0), 86_400);
        assert_eq!(time_to_next_period(86_399), 1);
        assert_eq!(time_to_next_period(86_400), 86_400);
    }
}
