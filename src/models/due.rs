//! Which cards are up for review on a given day.
use super::{Card, Deck};
use chrono::NaiveDate;

/// A card is due when its due date is on or before `as_of`.
/// Cards without a due date are always due.
pub fn is_due(card: &Card, as_of: NaiveDate) -> bool {
    card.next_due.is_none_or(|due| due <= as_of)
}

/// Due cards of a deck, in deck order.
pub fn due_cards(deck: &Deck, as_of: NaiveDate) -> Vec<&Card> {
    deck.cards.iter().filter(|c| is_due(c, as_of)).collect()
}

pub fn due_count(deck: &Deck, as_of: NaiveDate) -> usize {
    deck.cards.iter().filter(|c| is_due(c, as_of)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn card_due(due: Option<NaiveDate>) -> Card {
        let mut card = Card::new("q", "a", date(1), Utc::now()).unwrap();
        card.next_due = due;
        card
    }

    #[test]
    fn test_due_today_is_due() {
        assert!(is_due(&card_due(Some(date(10))), date(10)));
    }

    #[test]
    fn test_due_tomorrow_is_not_due() {
        assert!(!is_due(&card_due(Some(date(11))), date(10)));
    }

    #[test]
    fn test_overdue_is_due() {
        assert!(is_due(&card_due(Some(date(2))), date(10)));
    }

    #[test]
    fn test_missing_due_date_is_due() {
        assert!(is_due(&card_due(None), date(10)));
    }

    #[test]
    fn test_due_cards_preserve_deck_order() {
        let mut deck = Deck::new("Deck", "", Utc::now()).unwrap();
        for (front, due) in [("a", 5), ("b", 20), ("c", 1), ("d", 10)] {
            let mut card = card_due(Some(date(due)));
            card.front = front.to_string();
            deck.cards.push(card);
        }

        let fronts: Vec<&str> = due_cards(&deck, date(10))
            .into_iter()
            .map(|c| c.front.as_str())
            .collect();
        assert_eq!(fronts, vec!["a", "c", "d"]);
        assert_eq!(due_count(&deck, date(10)), 3);
    }
}
