//! Source of "now" for every date computation in the library.
//!
//! Scheduling, due checks and streaks all take their notion of today from a
//! [`Clock`], so tests can pin the date and the app can simulate days passing.

use chrono::{DateTime, Days, Local, NaiveDate, SubsecRound, Utc};
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    /// Current instant, used for `lastReviewed` and `createdAt` timestamps.
    /// Millisecond precision, matching how timestamps are stored.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day, used for due dates and the review log.
    fn today(&self) -> NaiveDate;
}

/// Wall clock. Calendar days follow the local timezone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a given instant that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Pins the clock to midnight UTC of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    /// Moves the clock forward by whole calendar days.
    pub fn advance_days(&self, days: u64) {
        let current = self.now.get();
        if let Some(next) = current.checked_add_days(Days::new(days)) {
            self.now.set(next);
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get().trunc_subsecs(3)
    }

    fn today(&self) -> NaiveDate {
        self.now.get().date_naive()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
