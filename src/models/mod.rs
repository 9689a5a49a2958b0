pub mod card;
pub mod deck;
pub mod deck_set;
pub mod due;
pub mod grade;
pub mod leitner;
pub mod prefs;
pub mod review_log;
pub mod stats;
pub mod study_session;
pub mod timestamp;

pub use card::Card;
pub use deck::Deck;
pub use deck_set::DeckSet;
pub use grade::{Grade, GradePolicy};
pub use prefs::{Prefs, Theme};
pub use review_log::ReviewLog;
pub use stats::{BoxDistribution, Scope, Stats};
pub use study_session::StudySession;
