//! SQLite database connection and schema management for the ledger
//!
//! Manages the `~/.questline/ledger.db` database with automatic schema migration.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config;

/// Database wrapper with a shared connection
#[derive(Clone)]
pub struct LedgerDb {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl LedgerDb {
    /// Open or create the ledger database at the default location (~/.questline/ledger.db)
    pub fn open_default() -> Result<Self> {
        Self::open(&config::default_db_path())
    }

    /// Open or create the ledger database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create ledger dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open ledger db: {}", path.display()))?;

        Self::from_connection(conn)
    }

    /// Open an in-memory ledger, used by tests and throwaway demo runs
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory ledger db")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // WAL for concurrent readers; foreign keys enforce the cascades
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Get a reference to the connection
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("Ledger DB lock poisoned")
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()?;
        Ok(())
    }

    /// Run any pending migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        // Get current schema version
        let version: i32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM ledger_schema_version",
                [],
                |r| r.get(0),
            )
            .unwrap_or(0);

        // Future migrations go here
        // if version < 2 { ... }

        let _ = version;

        Ok(())
    }

    /// Delete all ledger data (reset to empty state), keeping the schema
    pub fn reset_all(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(
            r#"
            DELETE FROM player_prizes;
            DELETE FROM player_levels;
            DELETE FROM player_boosts;
            DELETE FROM level_prizes;
            DELETE FROM players;
            DELETE FROM prizes;
            DELETE FROM levels;
            DELETE FROM boosts;
            "#,
        )?;
        Ok(())
    }
}

/// SQL schema for the ledger database
const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS ledger_schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO ledger_schema_version VALUES (1);

-- ============================================
-- CATALOG (boosts, levels, prizes)
-- ============================================
CREATE TABLE IF NOT EXISTS boosts (
    id TEXT PRIMARY KEY,
    boost_type TEXT NOT NULL UNIQUE,        -- double_points, speed, shield
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS levels (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0   -- display hint, completion is not gated on it
);

CREATE TABLE IF NOT EXISTS prizes (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL
);

-- Which prizes are awarded on completing a level
CREATE TABLE IF NOT EXISTS level_prizes (
    level_id TEXT NOT NULL,
    prize_id TEXT NOT NULL,
    PRIMARY KEY (level_id, prize_id),
    FOREIGN KEY (level_id) REFERENCES levels(id) ON DELETE CASCADE,
    FOREIGN KEY (prize_id) REFERENCES prizes(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_level_prizes_level ON level_prizes(level_id);
CREATE INDEX IF NOT EXISTS idx_level_prizes_prize ON level_prizes(prize_id);

-- ============================================
-- PLAYERS
-- ============================================
CREATE TABLE IF NOT EXISTS players (
    id TEXT PRIMARY KEY,
    first_login INTEGER,                    -- ms since epoch, NULL until the first login
    last_login INTEGER,
    points INTEGER NOT NULL DEFAULT 0 CHECK (points >= 0)
);

-- Accumulated boost quantity per player, not a log of grants
CREATE TABLE IF NOT EXISTS player_boosts (
    player_id TEXT NOT NULL,
    boost_id TEXT NOT NULL,
    amount INTEGER NOT NULL DEFAULT 1 CHECK (amount >= 0),
    created_at INTEGER NOT NULL,
    PRIMARY KEY (player_id, boost_id),
    FOREIGN KEY (player_id) REFERENCES players(id) ON DELETE CASCADE,
    FOREIGN KEY (boost_id) REFERENCES boosts(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_player_boosts_player ON player_boosts(player_id);
CREATE INDEX IF NOT EXISTS idx_player_boosts_boost ON player_boosts(boost_id);

-- One row per (player, level); re-attempts mutate this row
CREATE TABLE IF NOT EXISTS player_levels (
    player_id TEXT NOT NULL,
    level_id TEXT NOT NULL,
    completed INTEGER,                      -- ms since epoch, NULL while incomplete
    score INTEGER NOT NULL DEFAULT 0 CHECK (score >= 0),
    PRIMARY KEY (player_id, level_id),
    FOREIGN KEY (player_id) REFERENCES players(id) ON DELETE CASCADE,
    FOREIGN KEY (level_id) REFERENCES levels(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_player_levels_player ON player_levels(player_id);
CREATE INDEX IF NOT EXISTS idx_player_levels_level ON player_levels(level_id);
CREATE INDEX IF NOT EXISTS idx_player_levels_completed ON player_levels(completed);

-- Prize grant events; the composite key means at most one grant per pair
CREATE TABLE IF NOT EXISTS player_prizes (
    player_id TEXT NOT NULL,
    prize_id TEXT NOT NULL,
    received_at INTEGER NOT NULL,
    PRIMARY KEY (player_id, prize_id),
    FOREIGN KEY (player_id) REFERENCES players(id) ON DELETE CASCADE,
    FOREIGN KEY (prize_id) REFERENCES prizes(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_player_prizes_player ON player_prizes(player_id);
CREATE INDEX IF NOT EXISTS idx_player_prizes_prize ON player_prizes(prize_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_and_init() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test_ledger.db");
        let db = LedgerDb::open(&db_path).unwrap();

        // Verify tables exist
        let conn = db.conn();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"players".to_string()));
        assert!(tables.contains(&"boosts".to_string()));
        assert!(tables.contains(&"levels".to_string()));
        assert!(tables.contains(&"prizes".to_string()));
        assert!(tables.contains(&"level_prizes".to_string()));
        assert!(tables.contains(&"player_boosts".to_string()));
        assert!(tables.contains(&"player_levels".to_string()));
        assert!(tables.contains(&"player_prizes".to_string()));
    }

    #[test]
    fn test_reset_all() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test_ledger.db");
        let db = LedgerDb::open(&db_path).unwrap();

        // Insert a catalog row
        {
            let conn = db.conn();
            conn.execute(
                "INSERT INTO prizes (id, title) VALUES ('p1', 'First Prize')",
                [],
            )
            .unwrap();
        }

        // Reset
        db.reset_all().unwrap();

        // Verify empty
        let conn = db.conn();
        let count: i32 = conn
            .query_row("SELECT COUNT(*) FROM prizes", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
