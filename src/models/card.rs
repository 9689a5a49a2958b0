//! Card is a pair <front, back> together with its spaced-repetition state.
use super::leitner::{BASE_EASE, MIN_BOX};
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Field order matches the persisted JSON shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(rename = "box")]
    pub leitner_box: u8,
    #[serde(default, with = "super::timestamp::option")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_due: Option<NaiveDate>,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub times_reviewed: u32,
    #[serde(default = "default_ease")]
    pub ease: u16,
}

fn default_ease() -> u16 {
    BASE_EASE
}

impl Card {
    /// New cards start in box 1 and are due on the day they are created.
    pub fn new(front: &str, back: &str, today: NaiveDate, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            front: required("front", front)?,
            back: required("back", back)?,
            leitner_box: MIN_BOX,
            last_reviewed: None,
            next_due: Some(today),
            created_at: now,
            times_reviewed: 0,
            ease: BASE_EASE,
        })
    }

    /// Replaces the text of the card, leaving its schedule alone.
    pub fn set_text(&mut self, front: &str, back: &str) -> Result<()> {
        let front = required("front", front)?;
        let back = required("back", back)?;
        self.front = front;
        self.back = back;
        Ok(())
    }

    pub fn is_mastered(&self) -> bool {
        self.leitner_box == super::leitner::MAX_BOX
    }
}

/// Trims `value`, rejecting it if nothing is left.
pub(crate) fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyField(field));
    }
    Ok(trimmed.to_string())
}
