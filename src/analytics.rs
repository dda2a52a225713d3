use serde::Serialize;

use crate::database::Repository;
use crate::model::DEFAULT_FLOOR;

/// One bar of the mentor's points chart.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PointsBar {
    pub student: String,
    pub points: u32,
    /// Bar length relative to the highest score, in [0, 1].
    pub share: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FloorRow {
    pub student: String,
    pub points: u32,
    pub floor: char,
}

pub fn points_summary(store: &dyn Repository) -> Vec<PointsBar> {
    let students = store.students();
    let max = students.iter().map(|(_, s)| s.points).max().unwrap_or(0);
    students
        .into_iter()
        .map(|(_, s)| PointsBar {
            share: if max > 0 { s.points as f64 / max as f64 } else { 0.0 },
            student: s.name,
            points: s.points,
        })
        .collect()
}

/// Coordinator keys look like `fA`, `fB`; anything else falls back to floor A.
pub fn floor_for_coordinator(key: &str) -> char {
    if key.starts_with('f') {
        key.chars().last().unwrap_or(DEFAULT_FLOOR)
    } else {
        DEFAULT_FLOOR
    }
}

pub fn floor_performance(store: &dyn Repository, floor: char) -> Vec<FloorRow> {
    store
        .students()
        .into_iter()
        .filter(|(_, s)| s.floor == floor)
        .map(|(_, s)| FloorRow {
            student: s.name,
            points: s.points,
            floor: s.floor,
        })
        .collect()
}
