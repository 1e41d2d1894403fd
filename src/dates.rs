use chrono::{Datelike, Duration, Local, NaiveDate};

/// Formats a calendar day as a zero-padded `YYYY-MM-DD` key.
///
/// Keys sort lexicographically in the same order as the days they name.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The span of days tracked on the grid: `start_date` through December 31 of
/// the same year, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingWindow {
    pub start_date: NaiveDate,
    pub day_count: u32,
}

impl TrackingWindow {
    pub fn compute(start_date: NaiveDate) -> Self {
        let end = end_of_year(start_date);
        let day_count = (end - start_date).num_days() as u32 + 1;
        Self {
            start_date,
            day_count,
        }
    }

    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(i64::from(self.day_count) - 1)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.day_count).map(move |offset| self.start_date + Duration::days(i64::from(offset)))
    }
}

fn end_of_year(date: NaiveDate) -> NaiveDate {
    // Dec 31 exists in every year chrono can represent for a valid `date`.
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_key_is_zero_padded() {
        assert_eq!(date_key(ymd(2025, 4, 1)), "2025-04-01");
        assert_eq!(date_key(ymd(987, 12, 9)), "0987-12-09");
    }

    #[test]
    fn date_keys_sort_chronologically() {
        let days = [ymd(2024, 12, 31), ymd(2025, 1, 9), ymd(2025, 1, 10), ymd(2025, 10, 1)];
        let mut keys: Vec<String> = days.iter().rev().map(|d| date_key(*d)).collect();
        keys.sort();
        let expected: Vec<String> = days.iter().map(|d| date_key(*d)).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn window_from_last_day_of_year_has_one_day() {
        let window = TrackingWindow::compute(ymd(2025, 12, 31));
        assert_eq!(window.day_count, 1);
        assert_eq!(window.end_date(), ymd(2025, 12, 31));
    }

    #[test]
    fn window_covers_full_year_from_january_first() {
        assert_eq!(TrackingWindow::compute(ymd(2025, 1, 1)).day_count, 365);
        assert_eq!(TrackingWindow::compute(ymd(2024, 1, 1)).day_count, 366);
    }

    #[test]
    fn window_from_mid_april() {
        let window = TrackingWindow::compute(ymd(2025, 4, 10));
        assert_eq!(window.day_count, 266);
        assert_eq!(window.days().count(), 266);
        assert_eq!(window.days().next(), Some(ymd(2025, 4, 10)));
        assert_eq!(window.days().last(), Some(ymd(2025, 12, 31)));
    }
}
