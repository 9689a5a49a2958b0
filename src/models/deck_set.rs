//! Container for all available decks
use super::{Card, Deck};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Persisted as `{ "decks": [...] }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSet {
    #[serde(default)]
    pub decks: Vec<Deck>,
}

impl DeckSet {
    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    pub fn push(&mut self, deck: Deck) -> &Deck {
        self.decks.push(deck);
        &self.decks[self.decks.len() - 1]
    }

    pub fn get(&self, deck_id: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == deck_id)
    }

    pub fn get_mut(&mut self, deck_id: &str) -> Option<&mut Deck> {
        self.decks.iter_mut().find(|d| d.id == deck_id)
    }

    pub fn require(&self, deck_id: &str) -> Result<&Deck> {
        self.get(deck_id)
            .ok_or_else(|| Error::UnknownDeck(deck_id.to_string()))
    }

    pub fn require_mut(&mut self, deck_id: &str) -> Result<&mut Deck> {
        self.get_mut(deck_id)
            .ok_or_else(|| Error::UnknownDeck(deck_id.to_string()))
    }

    pub fn remove(&mut self, deck_id: &str) -> Result<Deck> {
        let idx = self
            .decks
            .iter()
            .position(|d| d.id == deck_id)
            .ok_or_else(|| Error::UnknownDeck(deck_id.to_string()))?;
        Ok(self.decks.remove(idx))
    }

    /// Decks whose name or description contains `search`, ignoring case.
    /// A blank search returns every deck.
    pub fn filter(&self, search: &str) -> Vec<&Deck> {
        let needle = search.trim().to_lowercase();
        if needle.is_empty() {
            return self.decks.iter().collect();
        }
        self.decks.iter().filter(|d| d.matches(&needle)).collect()
    }

    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.decks.iter().flat_map(|d| d.cards.iter())
    }
}
