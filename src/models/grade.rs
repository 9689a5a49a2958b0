//! Recall grades a learner can give a card.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// How many Leitner boxes the card moves.
    pub fn box_delta(self) -> i8 {
        match self {
            Grade::Again => -1,
            Grade::Hard => 0,
            Grade::Good => 1,
            Grade::Easy => 2,
        }
    }

    pub fn ease_delta(self) -> i16 {
        match self {
            Grade::Again => -40,
            Grade::Hard => -15,
            Grade::Good => 0,
            Grade::Easy => 15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "again" => Ok(Grade::Again),
            "hard" => Ok(Grade::Hard),
            "good" => Ok(Grade::Good),
            "easy" => Ok(Grade::Easy),
            other => Err(Error::InvalidGrade(other.to_string())),
        }
    }
}

/// What to do with a grade token that is not one of the four grades.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GradePolicy {
    /// Grade the card anyway with no box or ease change.
    #[default]
    Lenient,
    /// Reject the token and leave the card untouched.
    Strict,
}

impl GradePolicy {
    /// Parses a grade token. `Ok(None)` means "unrecognized, apply a null delta".
    pub fn parse(self, token: &str) -> Result<Option<Grade>> {
        match (token.parse::<Grade>(), self) {
            (Ok(grade), _) => Ok(Some(grade)),
            (Err(_), GradePolicy::Lenient) => {
                tracing::warn!(token, "unrecognized grade, applying null delta");
                Ok(None)
            }
            (Err(e), GradePolicy::Strict) => Err(e),
        }
    }
}
