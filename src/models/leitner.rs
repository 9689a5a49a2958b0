//! Leitner-box scheduling with a bounded ease factor.
//!
//! Each card sits in one of five boxes. A grade moves it between boxes and
//! nudges its ease:
//! - again: back one box, ease -40
//! - hard: same box, ease -15
//! - good: up one box, ease unchanged
//! - easy: up two boxes, ease +15
//!
//! The next due date is today plus the interval of the new box. Ease is kept
//! within bounds but does not feed into the interval.

use super::{Card, Grade};
use crate::clock::Clock;
use chrono::{DateTime, Days, NaiveDate, Utc};

pub const MIN_BOX: u8 = 1;
pub const MAX_BOX: u8 = 5;
pub const MIN_EASE: u16 = 130;
pub const MAX_EASE: u16 = 350;
pub const BASE_EASE: u16 = 250;

/// Days until a card in box `n` (index `n - 1`) is due again.
pub const DEFAULT_INTERVALS: [u64; 5] = [0, 1, 3, 7, 21];

/// Interval in days for a box; out-of-range boxes are clamped first.
pub fn interval_days(leitner_box: u8) -> u64 {
    let b = leitner_box.clamp(MIN_BOX, MAX_BOX);
    DEFAULT_INTERVALS[usize::from(b - 1)]
}

/// Calendar date `days` after `today`, saturating at the end of the calendar.
pub fn due_after(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Applies a grade to `card` in place and returns it.
/// `None` stands for an unrecognized grade: box and ease stay put, but the due
/// date is recomputed and the review still counts.
pub fn apply_grade(
    card: &mut Card,
    grade: Option<Grade>,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> &Card {
    let (box_delta, ease_delta) = grade.map_or((0, 0), |g| (g.box_delta(), g.ease_delta()));

    card.leitner_box = card
        .leitner_box
        .saturating_add_signed(box_delta)
        .clamp(MIN_BOX, MAX_BOX);
    card.ease = card.ease.saturating_add_signed(ease_delta).clamp(MIN_EASE, MAX_EASE);
    card.last_reviewed = Some(now);
    card.next_due = Some(due_after(today, interval_days(card.leitner_box)));
    card.times_reviewed = card.times_reviewed.saturating_add(1);

    tracing::debug!(
        card = %card.id,
        grade = grade.map_or("unrecognized", Grade::as_str),
        leitner_box = card.leitner_box,
        ease = card.ease,
        next_due = ?card.next_due,
        "card scheduled"
    );
    card
}

/// Applies a grade using the clock's idea of today and now.
pub fn schedule<'a>(card: &'a mut Card, grade: impl Into<Option<Grade>>, clock: &dyn Clock) -> &'a Card {
    apply_grade(card, grade.into(), clock.today(), clock.now())
}
