//! Command-line and environment configuration.

use crate::clock::{Clock, FixedClock, SystemClock};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser, Debug, Clone)]
#[command(name = "mindflash", about = "Flashcards with Leitner-box spaced repetition")]
pub struct Config {
    /// SQLite file the library is stored in
    #[arg(long, env = "MINDFLASH_DB", default_value = "mindflash.sqlite3")]
    pub db_path: PathBuf,

    /// Seed for the study queue shuffle; random when omitted
    #[arg(long, env = "MINDFLASH_SEED")]
    pub seed: Option<u64>,

    /// Pin "today" to a date (YYYY-MM-DD) and enable the Next Day button
    #[arg(long, env = "MINDFLASH_TODAY")]
    pub today: Option<NaiveDate>,

    /// Do not create sample decks on first run
    #[arg(long)]
    pub no_demo: bool,

    /// Log filter, e.g. "mindflash=debug" (RUST_LOG takes precedence)
    #[arg(long, default_value = "mindflash=info")]
    pub log_filter: String,
}

impl Config {
    /// The clock to run with. A pinned clock is also returned on its own so
    /// the caller can advance it.
    pub fn clock(&self) -> (Box<dyn Clock>, Option<Rc<FixedClock>>) {
        match self.today {
            Some(date) => {
                let fixed = Rc::new(FixedClock::at_date(date));
                (Box::new(Rc::clone(&fixed)), Some(fixed))
            }
            None => (Box::new(SystemClock), None),
        }
    }
}
