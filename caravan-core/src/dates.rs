use chrono::{Duration, NaiveDate};

/// Returns `date` if it lies strictly after `today`, otherwise the date
/// `offset_days` after `today`. Comparison is lexicographic on ISO
/// `YYYY-MM-DD` strings, which orders the same as the dates themselves.
///
/// Upstream hotel APIs reject stays that start in the past, so callers push
/// check-in one day forward and check-out two days forward. Check-out is
/// compared against today as well, never against the adjusted check-in.
pub fn future_or(date: Option<&str>, today: NaiveDate, offset_days: i64) -> String {
    let today_str = today.format("%Y-%m-%d").to_string();
    match date {
        Some(d) if d > today_str.as_str() => d.to_string(),
        _ => (today + Duration::days(offset_days))
            .format("%Y-%m-%d")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn future_date_passes_through() {
        assert_eq!(future_or(Some("2025-12-01"), today(), 1), "2025-12-01");
    }

    #[test]
    fn todays_date_moves_to_tomorrow() {
        assert_eq!(future_or(Some("2025-06-15"), today(), 1), "2025-06-16");
    }

    #[test]
    fn past_date_moves_forward() {
        assert_eq!(future_or(Some("2024-01-01"), today(), 1), "2025-06-16");
        assert_eq!(future_or(Some("2024-01-01"), today(), 2), "2025-06-17");
    }

    #[test]
    fn missing_date_uses_offset() {
        assert_eq!(future_or(None, today(), 2), "2025-06-17");
    }

    #[test]
    fn empty_string_counts_as_missing() {
        assert_eq!(future_or(Some(""), today(), 1), "2025-06-16");
    }

    #[test]
    fn month_boundary_rolls_over() {
        let eom = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert_eq!(future_or(Some("2025-06-30"), eom, 1), "2025-07-01");
        assert_eq!(future_or(None, eom, 2), "2025-07-02");
    }
}
