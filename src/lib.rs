pub mod clock;
pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use clock::{Clock, FixedClock, SystemClock};
pub use context::StudyContext;
pub use error::{Error, Result};
pub use models::{Card, Deck, DeckSet, Grade, GradePolicy, ReviewLog, StudySession};
