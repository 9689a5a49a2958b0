//! Per-day review counters, used for streaks and activity history.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialized as `{ "YYYY-MM-DD": count }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewLog {
    days: BTreeMap<NaiveDate, u32>,
}

impl ReviewLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more review on `date` and returns that day's new total.
    pub fn record_review(&mut self, date: NaiveDate) -> u32 {
        let count = self.days.entry(date).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.days.get(&date).copied().unwrap_or(0)
    }

    /// Consecutive days with at least one review, counting back from `as_of`.
    /// Zero if nothing has been reviewed on `as_of` itself.
    pub fn compute_streak(&self, as_of: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut cursor = Some(as_of);
        while let Some(day) = cursor {
            if self.count_on(day) == 0 {
                break;
            }
            streak += 1;
            cursor = day.checked_sub_days(Days::new(1));
        }
        streak
    }

    /// The `n` days ending at `as_of`, oldest first, with zero for idle days.
    pub fn reviews_in_window(&self, n: usize, as_of: NaiveDate) -> Vec<(NaiveDate, u32)> {
        (0..n as u64)
            .rev()
            .filter_map(|back| as_of.checked_sub_days(Days::new(back)))
            .map(|day| (day, self.count_on(day)))
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.days.values().map(|&c| u64::from(c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Drops every counter. Only a full data reset should call this.
    pub fn clear(&mut self) {
        self.days.clear();
    }
}
