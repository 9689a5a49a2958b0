//! Summary numbers for the analytics view.
use super::{Card, ReviewLog, due, leitner};
use chrono::NaiveDate;

/// Which decks a statistic covers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    All,
    Deck(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub due_today: usize,
    pub mastered: usize,
    pub streak: u32,
}

impl Stats {
    pub fn compute<'a>(
        cards: impl IntoIterator<Item = &'a Card>,
        log: &ReviewLog,
        today: NaiveDate,
    ) -> Self {
        let mut stats = Stats {
            streak: log.compute_streak(today),
            ..Default::default()
        };
        for card in cards {
            stats.total += 1;
            if due::is_due(card, today) {
                stats.due_today += 1;
            }
            if card.is_mastered() {
                stats.mastered += 1;
            }
        }
        stats
    }
}

/// Number of cards in each Leitner box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoxDistribution([usize; leitner::MAX_BOX as usize]);

impl BoxDistribution {
    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut counts = [0; leitner::MAX_BOX as usize];
        for card in cards {
            let b = card.leitner_box.clamp(leitner::MIN_BOX, leitner::MAX_BOX);
            counts[usize::from(b - 1)] += 1;
        }
        Self(counts)
    }

    pub fn count(&self, leitner_box: u8) -> usize {
        match leitner_box {
            leitner::MIN_BOX..=leitner::MAX_BOX => self.0[usize::from(leitner_box - 1)],
            _ => 0,
        }
    }

    /// `(box, count)` pairs for boxes 1 through 5.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        (leitner::MIN_BOX..=leitner::MAX_BOX).zip(self.0.iter().copied())
    }

    pub fn max(&self) -> usize {
        self.0.iter().copied().max().unwrap_or(0)
    }
}
