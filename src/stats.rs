use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::notion::model::PageObject;

const DIFFICULTY_PROPERTY: &str = "Difficulty";
const DATE_PROPERTY: &str = "Date Solved";

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    /// Consecutive days with at least one solve, ending today (or yesterday).
    pub streak: u32,
}

pub fn progress(pages: &[PageObject], today: NaiveDate) -> Progress {
    let mut p = Progress {
        total: pages.len(),
        ..Default::default()
    };

    let mut days = BTreeSet::new();
    for page in pages {
        match page.select(DIFFICULTY_PROPERTY).map(str::to_lowercase).as_deref() {
            Some("easy") => p.easy += 1,
            Some("medium") => p.medium += 1,
            Some("hard") => p.hard += 1,
            _ => {}
        }
        if let Some(day) = page.date_start(DATE_PROPERTY).and_then(parse_day) {
            days.insert(day);
        }
    }

    p.streak = streak(&days, today);
    p
}

/// Accepts `2026-10-18` as well as full timestamps.
fn parse_day(start: &str) -> Option<NaiveDate> {
    let date = start.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut day = if days.contains(&today) {
        today
    } else {
        match today.checked_sub_days(Days::new(1)) {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut count = 0;
    while days.contains(&day) {
        count += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(prev) => day = prev,
            None => break,
        }
    }
    count
}
