//! JSON backup of the whole library.
//! Saves and loads every deck with its cards plus the review log as one
//! version-tagged document.

use crate::error::{Error, Result};
use crate::models::{Deck, ReviewLog};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const BACKUP_VERSION: u32 = 1;

/// `{ "version": 1, "decks": [...], "reviewLog": { "YYYY-MM-DD": n } }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub version: u32,
    pub decks: Vec<Deck>,
    #[serde(default)]
    pub review_log: ReviewLog,
}

impl Backup {
    pub fn new(decks: Vec<Deck>, review_log: ReviewLog) -> Self {
        Self {
            version: BACKUP_VERSION,
            decks,
            review_log,
        }
    }
}

#[derive(Deserialize)]
struct VersionTag {
    version: u32,
}

pub fn to_json_string(backup: &Backup) -> Result<String> {
    Ok(serde_json::to_string_pretty(backup)?)
}

/// Parses a backup, refusing any version other than [`BACKUP_VERSION`].
pub fn from_json_str(json: &str) -> Result<Backup> {
    // Check the tag first so a newer format reports its version rather than
    // whatever field it happens to trip over.
    let tag: VersionTag = serde_json::from_str(json)?;
    if tag.version != BACKUP_VERSION {
        return Err(Error::UnsupportedVersion {
            found: tag.version,
            expected: BACKUP_VERSION,
        });
    }
    Ok(serde_json::from_str(json)?)
}

/// Exports a backup to a JSON file at the specified path.
pub fn export_json_to_path(backup: &Backup, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path.as_ref(), to_json_string(backup)?)?;
    tracing::info!(
        path = %path.as_ref().display(),
        decks = backup.decks.len(),
        "backup exported"
    );
    Ok(())
}

/// Imports a backup from a JSON file.
pub fn import_json(path: impl AsRef<Path>) -> Result<Backup> {
    let contents = fs::read_to_string(path.as_ref())?;
    let backup = from_json_str(&contents)?;
    tracing::info!(
        path = %path.as_ref().display(),
        decks = backup.decks.len(),
        "backup imported"
    );
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, Grade, leitner};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn create_test_backup() -> Backup {
        let today = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 11, 2, 9, 30, 0).unwrap();

        let mut deck = Deck::new("Test Deck", "greetings", now).unwrap();
        deck.add_card(Card::new("hello", "cześć", today, now).unwrap());
        let mut reviewed = Card::new("goodbye", "do widzenia", today, now).unwrap();
        leitner::apply_grade(&mut reviewed, Some(Grade::Easy), today, now);
        deck.add_card(reviewed);

        let mut log = ReviewLog::new();
        log.record_review(today);
        Backup::new(vec![deck], log)
    }

    #[test]
    fn test_export_json_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        export_json_to_path(&create_test_backup(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"version\": 1"));
        assert!(written.contains("\"reviewLog\""));
    }

    #[test]
    fn test_import_json() {
        let json_content = r#"{
  "version": 1,
  "decks": [
    {
      "id": "d1",
      "name": "Import Test Deck",
      "description": "",
      "createdAt": "2024-01-01T08:00:00.000Z",
      "cards": [
        {
          "id": "c1",
          "front": "test front",
          "back": "test back",
          "box": 3,
          "lastReviewed": "2024-01-05T08:00:00.000Z",
          "nextDue": "2024-01-08",
          "createdAt": "2024-01-01T08:00:00.000Z",
          "timesReviewed": 2,
          "ease": 265
        }
      ]
    }
  ],
  "reviewLog": { "2024-01-05": 3 }
}"#;

        let backup = from_json_str(json_content).unwrap();
        assert_eq!(backup.decks.len(), 1);
        let card = &backup.decks[0].cards[0];
        assert_eq!(card.front, "test front");
        assert_eq!(card.leitner_box, 3);
        assert_eq!(card.ease, 265);
        assert_eq!(card.next_due, NaiveDate::from_ymd_opt(2024, 1, 8));
        assert_eq!(card.times_reviewed, 2);
        assert_eq!(
            backup
                .review_log
                .count_on(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            3
        );
    }

    #[test]
    fn test_export_and_import_roundtrip() {
        let original = create_test_backup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.json");

        export_json_to_path(&original, &path).unwrap();
        let imported = import_json(&path).unwrap();

        assert_eq!(imported, original);
        for (orig, imp) in original.decks[0].cards.iter().zip(&imported.decks[0].cards) {
            assert_eq!(orig.leitner_box, imp.leitner_box);
            assert_eq!(orig.ease, imp.ease);
            assert_eq!(orig.next_due, imp.next_due);
            assert_eq!(orig.times_reviewed, imp.times_reviewed);
            assert_eq!(orig.last_reviewed, imp.last_reviewed);
        }
    }

    #[test]
    fn test_import_then_export_keeps_text() {
        let input = concat!(
            r#"{"version":1,"decks":[{"id":"d1","name":"Deck","description":"","#,
            r#""createdAt":"2024-01-01T08:00:00.000Z","cards":["#,
            r#"{"id":"c1","front":"f","back":"b","box":3,"#,
            r#""lastReviewed":"2024-01-05T08:00:00.250Z","nextDue":"2024-01-08","#,
            r#""createdAt":"2024-01-01T08:00:00.000Z","timesReviewed":2,"ease":265},"#,
            r#"{"id":"c2","front":"f2","back":"b2","box":1,"lastReviewed":null,"#,
            r#""nextDue":"2024-01-05","createdAt":"2024-01-01T08:00:00.000Z","#,
            r#""timesReviewed":0,"ease":250}]}],"reviewLog":{"2024-01-05":3}}"#,
        );

        let backup = from_json_str(input).unwrap();
        assert_eq!(serde_json::to_string(&backup).unwrap(), input);
    }

    #[test]
    fn test_fresh_timestamps_are_written_with_millis() {
        let now = Utc.with_ymd_and_hms(2024, 11, 2, 9, 30, 0).unwrap()
            + chrono::Duration::nanoseconds(987_654_321);
        let deck = Deck::new("Precise", "", now).unwrap();
        let json = serde_json::to_string(&deck).unwrap();
        assert!(json.contains(r#""createdAt":"2024-11-02T09:30:00.987Z""#));
    }

    #[test]
    fn test_card_field_order_is_kept() {
        let json = to_json_string(&create_test_backup()).unwrap();
        let positions: Vec<usize> = [
            "\"front\"", "\"back\"", "\"box\"", "\"lastReviewed\"", "\"nextDue\"",
            "\"createdAt\"", "\"timesReviewed\"", "\"ease\"",
        ]
        .iter()
        .map(|key| json.rfind(key).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_json("nonexistent_file_xyz123.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let result = from_json_str("{ this is not valid json }");
        assert!(matches!(result, Err(Error::MalformedPayload(_))));
    }

    #[test]
    fn test_import_missing_version() {
        let result = from_json_str(r#"{ "decks": [] }"#);
        assert!(matches!(result, Err(Error::MalformedPayload(_))));
    }

    #[test]
    fn test_import_future_version() {
        let result = from_json_str(r#"{ "version": 2, "decks": [], "somethingNew": true }"#);
        assert!(matches!(
            result,
            Err(Error::UnsupportedVersion { found: 2, expected: 1 })
        ));
    }
}
