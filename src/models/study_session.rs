//! Study session management.
//! Serves the due cards of one deck, one at a time, in a single pass.

use super::{Card, Deck, Grade, ReviewLog, due, leitner};
use crate::clock::Clock;
use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;

/// One study run over a deck.
/// The queue is fixed when the session starts and consumed front to back.
/// Graded cards leave the queue for good, even if they are still due.
#[derive(Clone, Debug)]
pub struct StudySession {
    deck_id: String,
    queue: VecDeque<String>,
    reviewed: usize,
}

impl StudySession {
    /// Queues the cards of `deck` due on `as_of`, shuffled with `rng`.
    pub fn start<R: Rng + ?Sized>(deck: &Deck, as_of: NaiveDate, rng: &mut R) -> Self {
        let mut ids: Vec<String> = due::due_cards(deck, as_of)
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
        ids.shuffle(rng);

        tracing::info!(deck = %deck.name, due = ids.len(), "study session started");

        Self {
            deck_id: deck.id.clone(),
            queue: ids.into(),
            reviewed: 0,
        }
    }

    pub fn deck_id(&self) -> &str {
        &self.deck_id
    }

    /// Id of the card at the head of the queue.
    pub fn current_id(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    /// The head card, looked up in `deck`.
    pub fn current<'a>(&self, deck: &'a Deck) -> Option<&'a Card> {
        self.current_id().and_then(|id| deck.card(id))
    }

    /// Grades the head card, logs the review for today and moves on.
    /// Returns the updated card, or `None` when there was nothing to grade.
    pub fn grade(
        &mut self,
        deck: &mut Deck,
        log: &mut ReviewLog,
        grade: impl Into<Option<Grade>>,
        clock: &dyn Clock,
    ) -> Option<Card> {
        let card_id = self.queue.pop_front()?;
        let Some(card) = deck.card_mut(&card_id) else {
            tracing::warn!(card = %card_id, "queued card no longer in deck, skipping");
            return None;
        };

        let updated = leitner::schedule(card, grade, clock).clone();
        log.record_review(clock.today());
        self.reviewed += 1;

        if self.queue.is_empty() {
            tracing::info!(reviewed = self.reviewed, "study session finished");
        }
        Some(updated)
    }

    /// Drops a card from the queue, e.g. after it was deleted from the deck.
    pub fn forget(&mut self, card_id: &str) {
        self.queue.retain(|id| id != card_id);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    pub fn is_completed(&self) -> bool {
        self.queue.is_empty()
    }
}
