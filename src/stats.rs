use crate::dates::date_key;
use crate::models::{is_valid_value, ActivityLog};
use chrono::NaiveDate;

/// Consecutive completed days ending at `today`. Zero when today itself is
/// not completed.
pub fn current_streak(log: &ActivityLog, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = Some(today);
    while let Some(date) = day {
        match log.get(&date_key(date)) {
            Some(record) if record.completed => {
                streak += 1;
                day = date.pred_opt();
            }
            _ => break,
        }
    }
    streak
}

/// Sum of recorded values across completed days. Values that are not a
/// finite, non-negative number count as zero.
pub fn total_completed_value(log: &ActivityLog) -> f64 {
    log.iter()
        .filter(|(_, record)| record.completed)
        .map(|(_, record)| record.details.value)
        .filter(|value| is_valid_value(*value))
        .sum()
}

pub fn streak_label(streak: u32) -> String {
    let suffix = if streak == 1 { "day streak" } else { "days streak" };
    format!("{streak} {suffix}")
}

/// Renders a value without a trailing `.0` for whole numbers.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
