//! The library's state and the operations callers run against it.
//!
//! [`StudyContext`] owns the decks, review log, preferences and the active
//! study session, together with the clock, the shuffle source and the store
//! they are persisted to. Every mutating operation writes the affected
//! documents back to the store before returning.

use crate::clock::Clock;
use crate::database::store::{DATA_KEY, KeyValueStore, PREFS_KEY, REVIEW_LOG_KEY};
use crate::error::Result;
use crate::export::json::{self, Backup};
use crate::models::{
    BoxDistribution, Card, Deck, DeckSet, Grade, GradePolicy, Prefs, ReviewLog, Scope, Stats,
    StudySession, Theme, due,
};
use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Days shown by the review activity chart.
pub const DEFAULT_ACTIVITY_DAYS: usize = 14;

pub struct StudyContext {
    decks: DeckSet,
    review_log: ReviewLog,
    prefs: Prefs,
    session: Option<StudySession>,
    clock: Box<dyn Clock>,
    rng: StdRng,
    store: Box<dyn KeyValueStore>,
    grade_policy: GradePolicy,
}

impl StudyContext {
    /// Loads whatever the store holds; missing documents start out empty.
    pub fn open(
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        seed: Option<u64>,
    ) -> Result<Self> {
        let decks: DeckSet = load_or_default(store.as_ref(), DATA_KEY)?;
        let review_log: ReviewLog = load_or_default(store.as_ref(), REVIEW_LOG_KEY)?;
        let prefs: Prefs = load_or_default(store.as_ref(), PREFS_KEY)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        tracing::info!(
            decks = decks.decks.len(),
            reviews = review_log.total(),
            "library loaded"
        );

        Ok(Self {
            decks,
            review_log,
            prefs,
            session: None,
            clock,
            rng,
            store,
            grade_policy: GradePolicy::default(),
        })
    }

    pub fn with_grade_policy(mut self, policy: GradePolicy) -> Self {
        self.grade_policy = policy;
        self
    }

    pub fn grade_policy(&self) -> GradePolicy {
        self.grade_policy
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn decks(&self) -> &[Deck] {
        &self.decks.decks
    }

    pub fn deck(&self, deck_id: &str) -> Result<&Deck> {
        self.decks.require(deck_id)
    }

    pub fn filter_decks(&self, search: &str) -> Vec<&Deck> {
        self.decks.filter(search)
    }

    pub fn review_log(&self) -> &ReviewLog {
        &self.review_log
    }

    pub fn prefs(&self) -> &Prefs {
        &self.prefs
    }

    // ---- decks ----

    pub fn create_deck(&mut self, name: &str, description: &str) -> Result<Deck> {
        let deck = Deck::new(name, description, self.clock.now())?;
        let created = self.decks.push(deck).clone();
        self.save_decks()?;
        tracing::info!(deck = %created.name, id = %created.id, "deck created");
        Ok(created)
    }

    pub fn update_deck(&mut self, deck_id: &str, name: &str, description: &str) -> Result<Deck> {
        let deck = self.decks.require_mut(deck_id)?;
        deck.rename(name, description)?;
        let updated = deck.clone();
        self.save_decks()?;
        Ok(updated)
    }

    /// Deletes a deck with all of its cards, ending any session on it.
    pub fn delete_deck(&mut self, deck_id: &str) -> Result<Deck> {
        let removed = self.decks.remove(deck_id)?;
        if self.session.as_ref().is_some_and(|s| s.deck_id() == deck_id) {
            self.session = None;
        }
        self.save_decks()?;
        tracing::info!(deck = %removed.name, cards = removed.cards.len(), "deck deleted");
        Ok(removed)
    }

    // ---- cards ----

    pub fn create_card(&mut self, deck_id: &str, front: &str, back: &str) -> Result<Card> {
        let card = Card::new(front, back, self.clock.today(), self.clock.now())?;
        let created = self.decks.require_mut(deck_id)?.add_card(card).clone();
        self.save_decks()?;
        tracing::debug!(deck = deck_id, card = %created.id, "card created");
        Ok(created)
    }

    pub fn update_card(
        &mut self,
        deck_id: &str,
        card_id: &str,
        front: &str,
        back: &str,
    ) -> Result<Card> {
        let updated = self
            .decks
            .require_mut(deck_id)?
            .update_card(card_id, front, back)?
            .clone();
        self.save_decks()?;
        Ok(updated)
    }

    pub fn delete_card(&mut self, deck_id: &str, card_id: &str) -> Result<Card> {
        let removed = self.decks.require_mut(deck_id)?.remove_card(card_id)?;
        if let Some(session) = self.session.as_mut() {
            session.forget(card_id);
        }
        self.save_decks()?;
        Ok(removed)
    }

    // ---- study ----

    /// Starts a study run over the cards of `deck_id` due today, replacing
    /// any session in progress.
    pub fn start_study(&mut self, deck_id: &str) -> Result<&StudySession> {
        let deck = self.decks.require(deck_id)?;
        let session = StudySession::start(deck, self.clock.today(), &mut self.rng);
        Ok(self.session.insert(session))
    }

    pub fn session(&self) -> Option<&StudySession> {
        self.session.as_ref()
    }

    pub fn end_session(&mut self) {
        self.session = None;
    }

    /// The card currently shown in the session.
    pub fn current_card(&self) -> Option<&Card> {
        let session = self.session.as_ref()?;
        let deck = self.decks.get(session.deck_id())?;
        session.current(deck)
    }

    /// Grades the current card and persists the card and the review log.
    /// Returns `Ok(None)` when no session has a card to grade.
    pub fn grade_current(&mut self, grade: impl Into<Option<Grade>>) -> Result<Option<Card>> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let Some(deck) = self.decks.get_mut(session.deck_id()) else {
            return Ok(None);
        };

        let graded = session.grade(deck, &mut self.review_log, grade, self.clock.as_ref());
        if graded.is_some() {
            self.save_decks()?;
            self.save_review_log()?;
        }
        Ok(graded)
    }

    /// Like [`grade_current`](Self::grade_current) for a textual grade,
    /// following the context's [`GradePolicy`] for unknown tokens.
    pub fn grade_current_token(&mut self, token: &str) -> Result<Option<Card>> {
        let grade = self.grade_policy.parse(token)?;
        self.grade_current(grade)
    }

    /// Cards of the session's deck that are still due today.
    pub fn session_due_count(&self) -> usize {
        self.session
            .as_ref()
            .and_then(|s| self.decks.get(s.deck_id()))
            .map_or(0, |deck| due::due_count(deck, self.clock.today()))
    }

    pub fn due_cards(&self, deck_id: &str) -> Result<Vec<&Card>> {
        Ok(due::due_cards(self.decks.require(deck_id)?, self.clock.today()))
    }

    /// Logs a review outside of a session and persists the log.
    pub fn record_review(&mut self, date: NaiveDate) -> Result<u32> {
        let count = self.review_log.record_review(date);
        self.save_review_log()?;
        Ok(count)
    }

    // ---- analytics ----

    pub fn stats(&self, scope: &Scope) -> Result<Stats> {
        let today = self.clock.today();
        Ok(match scope {
            Scope::All => Stats::compute(self.decks.all_cards(), &self.review_log, today),
            Scope::Deck(id) => Stats::compute(&self.decks.require(id)?.cards, &self.review_log, today),
        })
    }

    pub fn box_distribution(&self, scope: &Scope) -> Result<BoxDistribution> {
        Ok(match scope {
            Scope::All => BoxDistribution::from_cards(self.decks.all_cards()),
            Scope::Deck(id) => BoxDistribution::from_cards(&self.decks.require(id)?.cards),
        })
    }

    pub fn streak(&self) -> u32 {
        self.review_log.compute_streak(self.clock.today())
    }

    /// Review counts for the last `n` days ending today, oldest first.
    pub fn reviews_last_n_days(&self, n: usize) -> Vec<(NaiveDate, u32)> {
        self.review_log.reviews_in_window(n, self.clock.today())
    }

    // ---- preferences ----

    pub fn set_theme(&mut self, theme: Theme) -> Result<Theme> {
        self.prefs.theme = theme;
        self.save_prefs()?;
        Ok(theme)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.set_theme(self.prefs.theme.next())
    }

    // ---- backup ----

    pub fn export_payload(&self) -> Backup {
        Backup::new(self.decks.decks.clone(), self.review_log.clone())
    }

    pub fn export_json_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        json::export_json_to_path(&self.export_payload(), path)
    }

    /// Replaces all decks and the review log with the backup's contents.
    pub fn import_backup(&mut self, backup: Backup) -> Result<()> {
        self.decks = DeckSet {
            decks: backup.decks,
        };
        self.review_log = backup.review_log;
        self.session = None;
        self.save_decks()?;
        self.save_review_log()?;
        Ok(())
    }

    pub fn import_json(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let backup = json::import_json(path)?;
        self.import_backup(backup)
    }

    pub fn import_str(&mut self, contents: &str) -> Result<()> {
        let backup = json::from_json_str(contents)?;
        self.import_backup(backup)
    }

    /// Erases decks, review log and preferences, in memory and in the store.
    pub fn reset_all(&mut self) -> Result<()> {
        self.store.remove(DATA_KEY)?;
        self.store.remove(PREFS_KEY)?;
        self.store.remove(REVIEW_LOG_KEY)?;
        self.decks = DeckSet::default();
        self.review_log.clear();
        self.prefs = Prefs::default();
        self.session = None;
        tracing::warn!("all data erased");
        Ok(())
    }

    /// Fills an empty library with two sample decks. Returns whether it did.
    pub fn seed_demo(&mut self) -> Result<bool> {
        if !self.decks.is_empty() {
            return Ok(false);
        }

        let web = self.create_deck("Web Dev Basics", "HTML, CSS, JS essentials")?.id;
        self.create_card(&web, "What does HTML stand for?", "HyperText Markup Language")?;
        self.create_card(&web, "What is CSS used for?", "Styling and layout of web pages")?;
        self.create_card(
            &web,
            "const vs let?",
            "const is block-scoped and cannot be reassigned; let is block-scoped and can be reassigned.",
        )?;

        let algo = self.create_deck("Algorithms", "Big-O and patterns")?.id;
        self.create_card(&algo, "Big-O of binary search?", "O(log n)")?;
        self.create_card(
            &algo,
            "Two-pointer pattern usage?",
            "Finding pairs, subarrays in sorted arrays/strings efficiently.",
        )?;

        tracing::info!("sample decks created");
        Ok(true)
    }

    // ---- persistence ----

    fn save_decks(&mut self) -> Result<()> {
        save(self.store.as_mut(), DATA_KEY, &self.decks)
    }

    fn save_review_log(&mut self) -> Result<()> {
        save(self.store.as_mut(), REVIEW_LOG_KEY, &self.review_log)
    }

    fn save_prefs(&mut self) -> Result<()> {
        save(self.store.as_mut(), PREFS_KEY, &self.prefs)
    }
}

fn load_or_default<T: DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<T> {
    match store.get(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(T::default()),
    }
}

fn save<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::database::MemoryStore;
    use crate::error::Error;
    use std::rc::Rc;

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 30).unwrap()
    }

    fn context() -> (StudyContext, Rc<FixedClock>) {
        let clock = Rc::new(FixedClock::at_date(start_date()));
        let ctx = StudyContext::open(
            Box::new(MemoryStore::new()),
            Box::new(Rc::clone(&clock)),
            Some(11),
        )
        .unwrap();
        (ctx, clock)
    }

    #[test]
    fn test_create_and_edit_deck() {
        let (mut ctx, _) = context();
        let deck = ctx.create_deck("Spanish", "verbs").unwrap();
        let updated = ctx.update_deck(&deck.id, "Spanish A1", "").unwrap();
        assert_eq!(updated.name, "Spanish A1");
        assert_eq!(ctx.decks().len(), 1);
        assert!(matches!(
            ctx.update_deck("missing", "x", ""),
            Err(Error::UnknownDeck(_))
        ));
    }

    #[test]
    fn test_card_crud_requires_known_deck() {
        let (mut ctx, _) = context();
        assert!(matches!(
            ctx.create_card("missing", "q", "a"),
            Err(Error::UnknownDeck(_))
        ));

        let deck = ctx.create_deck("D", "").unwrap();
        let card = ctx.create_card(&deck.id, "q", "a").unwrap();
        assert_eq!(card.next_due, Some(start_date()));

        ctx.update_card(&deck.id, &card.id, "q2", "a2").unwrap();
        assert_eq!(ctx.deck(&deck.id).unwrap().cards[0].front, "q2");

        ctx.delete_card(&deck.id, &card.id).unwrap();
        assert!(matches!(
            ctx.delete_card(&deck.id, &card.id),
            Err(Error::UnknownCard(_))
        ));
    }

    #[test]
    fn test_study_session_flow() {
        let (mut ctx, clock) = context();
        let deck = ctx.create_deck("D", "").unwrap();
        for i in 0..3 {
            ctx.create_card(&deck.id, &format!("q{i}"), "a").unwrap();
        }

        assert_eq!(ctx.start_study(&deck.id).unwrap().remaining(), 3);
        assert!(ctx.current_card().is_some());

        let card = ctx.grade_current(Grade::Good).unwrap().unwrap();
        assert_eq!(card.leitner_box, 2);
        assert_eq!(card.next_due, Some(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert_eq!(ctx.session_due_count(), 2);

        ctx.grade_current(Grade::Again).unwrap();
        ctx.grade_current(Grade::Easy).unwrap();
        let session = ctx.session().unwrap();
        assert!(session.is_completed());
        assert_eq!(session.reviewed(), 3);
        assert_eq!(ctx.grade_current(Grade::Good).unwrap(), None);

        assert_eq!(ctx.review_log().count_on(clock.today()), 3);
        assert_eq!(ctx.streak(), 1);
        // The card graded again is still due today.
        assert_eq!(ctx.session_due_count(), 1);
    }

    #[test]
    fn test_lenient_token_grades_without_delta() {
        let (mut ctx, _) = context();
        let deck = ctx.create_deck("D", "").unwrap();
        ctx.create_card(&deck.id, "q", "a").unwrap();
        ctx.start_study(&deck.id).unwrap();

        let card = ctx.grade_current_token("perfect").unwrap().unwrap();
        assert_eq!(card.leitner_box, 1);
        assert_eq!(card.ease, 250);
        assert_eq!(card.times_reviewed, 1);
    }

    #[test]
    fn test_strict_token_rejected_and_card_untouched() {
        let (ctx, _) = context();
        let mut ctx = ctx.with_grade_policy(GradePolicy::Strict);
        let deck = ctx.create_deck("D", "").unwrap();
        ctx.create_card(&deck.id, "q", "a").unwrap();
        ctx.start_study(&deck.id).unwrap();

        assert!(matches!(
            ctx.grade_current_token("perfect"),
            Err(Error::InvalidGrade(_))
        ));
        assert_eq!(ctx.session().unwrap().remaining(), 1);
        assert_eq!(ctx.current_card().unwrap().times_reviewed, 0);
        assert!(ctx.review_log().is_empty());
    }

    #[test]
    fn test_deleting_deck_ends_its_session() {
        let (mut ctx, _) = context();
        let deck = ctx.create_deck("D", "").unwrap();
        ctx.create_card(&deck.id, "q", "a").unwrap();
        ctx.start_study(&deck.id).unwrap();

        ctx.delete_deck(&deck.id).unwrap();
        assert!(ctx.session().is_none());
        assert_eq!(ctx.grade_current(Grade::Good).unwrap(), None);
    }

    #[test]
    fn test_stats_and_distribution() {
        let (mut ctx, clock) = context();
        let a = ctx.create_deck("A", "").unwrap();
        let b = ctx.create_deck("B", "").unwrap();
        ctx.create_card(&a.id, "1", "1").unwrap();
        ctx.create_card(&a.id, "2", "2").unwrap();
        ctx.create_card(&b.id, "3", "3").unwrap();

        ctx.start_study(&a.id).unwrap();
        ctx.grade_current(Grade::Easy).unwrap();

        let all = ctx.stats(&Scope::All).unwrap();
        assert_eq!((all.total, all.due_today, all.streak), (3, 2, 1));
        let only_b = ctx.stats(&Scope::Deck(b.id.clone())).unwrap();
        assert_eq!(only_b.total, 1);

        let dist = ctx.box_distribution(&Scope::Deck(a.id.clone())).unwrap();
        assert_eq!(dist.count(1), 1);
        assert_eq!(dist.count(3), 1);

        clock.advance_days(1);
        assert_eq!(ctx.streak(), 0);
        let window = ctx.reviews_last_n_days(DEFAULT_ACTIVITY_DAYS);
        assert_eq!(window.len(), 14);
        assert_eq!(window[12], (start_date(), 1));
        assert_eq!(window[13].1, 0);

        assert!(matches!(
            ctx.stats(&Scope::Deck("missing".into())),
            Err(Error::UnknownDeck(_))
        ));
    }

    #[test]
    fn test_theme_toggle_persists() {
        let (mut ctx, _) = context();
        assert_eq!(ctx.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(ctx.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(ctx.prefs().theme, Theme::Dark);
        assert!(ctx.store.get(PREFS_KEY).unwrap().unwrap().contains("dark"));
    }

    #[test]
    fn test_seed_demo_only_when_empty() {
        let (mut ctx, _) = context();
        assert!(ctx.seed_demo().unwrap());
        assert_eq!(ctx.decks().len(), 2);
        assert_eq!(ctx.filter_decks("algo")[0].cards.len(), 2);
        assert!(!ctx.seed_demo().unwrap());
        assert_eq!(ctx.decks().len(), 2);
    }

    #[test]
    fn test_reset_all() {
        let (mut ctx, _) = context();
        ctx.seed_demo().unwrap();
        ctx.set_theme(Theme::Dark).unwrap();
        ctx.record_review(start_date()).unwrap();

        ctx.reset_all().unwrap();
        assert!(ctx.decks().is_empty());
        assert!(ctx.review_log().is_empty());
        assert_eq!(ctx.prefs().theme, Theme::System);
        assert_eq!(ctx.store.get(DATA_KEY).unwrap(), None);
    }

    #[test]
    fn test_import_replaces_library() {
        let (mut ctx, _) = context();
        ctx.seed_demo().unwrap();
        let payload = ctx.export_payload();

        let (mut other, _) = context();
        other.create_deck("Will be replaced", "").unwrap();
        other
            .import_str(&json::to_json_string(&payload).unwrap())
            .unwrap();

        assert_eq!(other.decks(), ctx.decks());
        assert_eq!(other.review_log(), ctx.review_log());
    }
}
