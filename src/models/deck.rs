//! Deck is an ordered set of cards
use super::Card;
use super::card::required;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(name: &str, description: &str, created_at: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: required("name", name)?,
            description: description.trim().to_string(),
            created_at,
            cards: Vec::new(),
        })
    }

    pub fn rename(&mut self, name: &str, description: &str) -> Result<()> {
        self.name = required("name", name)?;
        self.description = description.trim().to_string();
        Ok(())
    }

    /// Appends a card; insertion order is display order.
    pub fn add_card(&mut self, card: Card) -> &Card {
        self.cards.push(card);
        &self.cards[self.cards.len() - 1]
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn card_mut(&mut self, card_id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == card_id)
    }

    pub fn update_card(&mut self, card_id: &str, front: &str, back: &str) -> Result<&Card> {
        let card = self
            .card_mut(card_id)
            .ok_or_else(|| Error::UnknownCard(card_id.to_string()))?;
        card.set_text(front, back)?;
        Ok(card)
    }

    pub fn remove_card(&mut self, card_id: &str) -> Result<Card> {
        let idx = self
            .cards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or_else(|| Error::UnknownCard(card_id.to_string()))?;
        Ok(self.cards.remove(idx))
    }

    /// Case-insensitive match on name or description. `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn card(front: &str) -> Card {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Card::new(front, "back", today, Utc::now()).unwrap()
    }

    #[test]
    fn test_deck_creation_trims() {
        let deck = Deck::new("  Polish  ", " words ", Utc::now()).unwrap();
        assert_eq!(deck.name, "Polish");
        assert_eq!(deck.description, "words");
        assert!(deck.cards.is_empty());
        assert!(Deck::new(" ", "", Utc::now()).is_err());
    }

    #[test]
    fn test_add_update_remove_card() {
        let mut deck = Deck::new("Deck", "", Utc::now()).unwrap();
        let id = deck.add_card(card("one")).id.clone();
        deck.add_card(card("two"));

        deck.update_card(&id, "uno", "eins").unwrap();
        assert_eq!(deck.card(&id).unwrap().front, "uno");

        let removed = deck.remove_card(&id).unwrap();
        assert_eq!(removed.front, "uno");
        assert_eq!(deck.cards.len(), 1);
        assert_eq!(deck.cards[0].front, "two");
    }

    #[test]
    fn test_unknown_card_errors() {
        let mut deck = Deck::new("Deck", "", Utc::now()).unwrap();
        assert!(matches!(deck.remove_card("nope"), Err(Error::UnknownCard(_))));
        assert!(matches!(deck.update_card("nope", "a", "b"), Err(Error::UnknownCard(_))));
    }

    #[test]
    fn test_matches_name_or_description() {
        let deck = Deck::new("Web Dev Basics", "HTML, CSS, JS essentials", Utc::now()).unwrap();
        assert!(deck.matches("web"));
        assert!(deck.matches("css"));
        assert!(!deck.matches("big-o"));
    }
}
