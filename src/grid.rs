use crate::dates::{date_key, TrackingWindow};
use crate::models::ActivityLog;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    Future,
    Completed,
    Missed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub date: String,
    pub class: CellClass,
}

/// One cell per day of the window, in chronological order.
///
/// Days after `today_key` are always `Future`, whatever the log holds for
/// them. Keys are compared as strings; the fixed-width format keeps that
/// equivalent to comparing dates.
pub fn project(window: &TrackingWindow, log: &ActivityLog, today_key: &str) -> Vec<GridCell> {
    window
        .days()
        .map(|day| {
            let date = date_key(day);
            let class = classify(&date, log, today_key);
            GridCell { date, class }
        })
        .collect()
}

fn classify(date: &str, log: &ActivityLog, today_key: &str) -> CellClass {
    if date > today_key {
        return CellClass::Future;
    }
    match log.get(date) {
        Some(record) if record.completed => CellClass::Completed,
        _ => CellClass::Missed,
    }
}

/// Wraps a flat cell sequence into rows of `columns` cells; the last row may
/// be short.
pub fn rows(cells: &[GridCell], columns: u32) -> impl Iterator<Item = &[GridCell]> {
    cells.chunks(columns.max(1) as usize)
}
