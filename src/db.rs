// SQLite persistence layer for league state snapshots.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::gallery::Gallery;
use crate::league::store::Applicant;
use crate::league::team::Team;

/// Snapshot key for the team list (rosters included).
pub const KEY_TEAMS: &str = "teams";
/// Snapshot key for the pending applicant list.
pub const KEY_PENDING: &str = "pending";
/// Snapshot key for the photo gallery.
pub const KEY_GALLERY: &str = "gallery";

/// SQLite-backed key-value snapshot store. Each key holds the JSON
/// serialization of one whole collection; saves overwrite, loads return the
/// last snapshot or `None` when the key has never been written.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS league_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Persist an arbitrary JSON value under `key`. Uses INSERT OR REPLACE
    /// so repeated saves overwrite the previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO league_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the
    /// key does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM league_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| {
                let json_str: String = row.get(0)?;
                Ok(json_str)
            })
            .context("failed to query league state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value: serde_json::Value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Typed snapshot wrappers
    // ------------------------------------------------------------------

    /// Overwrite the persisted team list (rosters included).
    pub fn save_teams(&self, teams: &[Team]) -> Result<()> {
        let value = serde_json::to_value(teams).context("failed to serialize teams")?;
        self.save_state(KEY_TEAMS, &value)
    }

    /// Load the persisted team list, or `None` on first run.
    pub fn load_teams(&self) -> Result<Option<Vec<Team>>> {
        match self.load_state(KEY_TEAMS)? {
            Some(value) => {
                let teams = serde_json::from_value(value)
                    .context("failed to deserialize teams snapshot")?;
                Ok(Some(teams))
            }
            None => Ok(None),
        }
    }

    /// Overwrite the persisted pending applicant list.
    pub fn save_pending(&self, pending: &[Applicant]) -> Result<()> {
        let value =
            serde_json::to_value(pending).context("failed to serialize pending list")?;
        self.save_state(KEY_PENDING, &value)
    }

    /// Load the persisted pending applicant list, or `None` on first run.
    pub fn load_pending(&self) -> Result<Option<Vec<Applicant>>> {
        match self.load_state(KEY_PENDING)? {
            Some(value) => {
                let pending = serde_json::from_value(value)
                    .context("failed to deserialize pending snapshot")?;
                Ok(Some(pending))
            }
            None => Ok(None),
        }
    }

    /// Overwrite the persisted gallery.
    pub fn save_gallery(&self, gallery: &Gallery) -> Result<()> {
        let value =
            serde_json::to_value(gallery).context("failed to serialize gallery")?;
        self.save_state(KEY_GALLERY, &value)
    }

    /// Load the persisted gallery, or `None` on first run.
    pub fn load_gallery(&self) -> Result<Option<Gallery>> {
        match self.load_state(KEY_GALLERY)? {
            Some(value) => {
                let gallery = serde_json::from_value(value)
                    .context("failed to deserialize gallery snapshot")?;
                Ok(Some(gallery))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::ImageRef;
    use crate::league::store::tests_support::three_team_store;
    use crate::league::store::{tests_support, DraftAssignment};
    use crate::league::Position;
    use serde_json::json;

    /// Helper: create a fresh in-memory database for each test.
    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    #[test]
    fn open_creates_schema() {
        let db = test_db();
        let conn = db.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='league_state'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn save_and_load_state_round_trip() {
        let db = test_db();
        let value = json!({"league": "HYL", "season": 3});

        db.save_state("meta", &value).unwrap();
        assert_eq!(db.load_state("meta").unwrap(), Some(value));
    }

    #[test]
    fn load_state_returns_none_for_missing_key() {
        let db = test_db();
        assert!(db.load_state("nonexistent").unwrap().is_none());
    }

    #[test]
    fn save_state_overwrites_previous_value() {
        let db = test_db();
        db.save_state("key", &json!(1)).unwrap();
        db.save_state("key", &json!(2)).unwrap();
        assert_eq!(db.load_state("key").unwrap(), Some(json!(2)));
    }

    #[test]
    fn teams_snapshot_round_trips_with_rosters() {
        let db = test_db();
        let mut store = three_team_store();
        let id = store.add_player("team_1").unwrap().id.clone();
        store
            .set_player_name("team_1", &id, "Ali".to_string())
            .unwrap();

        db.save_teams(&store.teams).unwrap();
        let loaded = db.load_teams().unwrap().expect("teams saved above");

        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].players.len(), 1);
        assert_eq!(loaded[0].players[0].name, "Ali");
        assert_eq!(loaded[0].players[0].overall, 50);
    }

    #[test]
    fn pending_snapshot_round_trips() {
        let db = test_db();
        let pending = vec![Applicant {
            player: tests_support::player("p1", "Omar", None),
            draft: DraftAssignment {
                team_id: "team_2".to_string(),
                position: Position::Forward,
            },
        }];

        db.save_pending(&pending).unwrap();
        let loaded = db.load_pending().unwrap().expect("pending saved above");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].player.name, "Omar");
        assert_eq!(loaded[0].draft.team_id, "team_2");
        assert_eq!(loaded[0].draft.position, Position::Forward);
    }

    #[test]
    fn gallery_snapshot_round_trips() {
        let db = test_db();
        let mut gallery = Gallery::seeded(&["https://example.com/a.jpg".to_string()]);
        gallery.add(ImageRef::Inline {
            media_type: "image/jpeg".to_string(),
            data: vec![1, 2, 3],
        });

        db.save_gallery(&gallery).unwrap();
        let loaded = db.load_gallery().unwrap().expect("gallery saved above");
        assert_eq!(loaded, gallery);
    }

    #[test]
    fn first_run_has_no_snapshots() {
        let db = test_db();
        assert!(db.load_teams().unwrap().is_none());
        assert!(db.load_pending().unwrap().is_none());
        assert!(db.load_gallery().unwrap().is_none());
    }

    #[test]
    fn keys_are_independent() {
        let db = test_db();
        db.save_gallery(&Gallery::default()).unwrap();
        // Writing the gallery key leaves the others untouched.
        assert!(db.load_teams().unwrap().is_none());
        assert!(db.load_pending().unwrap().is_none());
        assert!(db.load_gallery().unwrap().is_some());
    }
}
