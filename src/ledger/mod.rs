//! Player progression and reward ledger
//!
//! Tracks players, their daily-login points, accumulated boosts, level
//! progress and granted prizes in a SQLite database
//! (`~/.questline/ledger.db`).
//!
//! # Usage
//!
//! ```ignore
//! let ledger = LedgerManager::new()?;
//!
//! // Onboard a player and record a login
//! let player = ledger.catalog().create_player()?;
//! ledger.progression().login(&player.id)?;
//!
//! // Complete a level; attached prizes are granted at most once
//! ledger.progression().complete_level(&player.id, &level.id, 100)?;
//!
//! // Export the per-level report
//! ledger.exporter().export_csv_file(Path::new("report.csv"))?;
//! ```

mod catalog;
mod db;
mod error;
mod export;
mod models;
mod progression;
mod queries;
mod time_bucket;

pub use catalog::Catalog;
pub use db::LedgerDb;
pub use error::LedgerError;
pub use export::{ExportRow, LevelExporter};
pub use models::{
    Boost, BoostType, Level, LevelPrize, Player, PlayerBoost, PlayerLevel, PlayerPrize, Prize,
};
pub use progression::{DAILY_LOGIN_BONUS, ProgressionEngine};
pub use queries::LedgerQuery;
pub use time_bucket::{current_day_bucket, day_bucket};

use std::path::Path;

use anyhow::Result;

/// Central handle for the progression ledger
///
/// Coordinates catalog writes, progression operations, queries and export.
/// Thread-safe through the internal mutex on the database connection.
#[derive(Clone)]
pub struct LedgerManager {
    db: LedgerDb,
}

impl LedgerManager {
    /// Create a manager with the default database location
    pub fn new() -> Result<Self> {
        Ok(Self {
            db: LedgerDb::open_default()?,
        })
    }

    /// Create a manager with a custom database path
    pub fn with_path(path: &Path) -> Result<Self> {
        Ok(Self {
            db: LedgerDb::open(path)?,
        })
    }

    /// Create a manager backed by an in-memory database
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            db: LedgerDb::open_in_memory()?,
        })
    }

    /// The underlying database handle
    pub fn db(&self) -> &LedgerDb {
        &self.db
    }

    /// Catalog bootstrap and player onboarding writes
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.db.clone())
    }

    /// The stateful player progression operations
    pub fn progression(&self) -> ProgressionEngine {
        ProgressionEngine::new(self.db.clone())
    }

    /// Read-only queries
    pub fn query(&self) -> LedgerQuery {
        LedgerQuery::new(self.db.clone())
    }

    /// CSV export of player level progress
    pub fn exporter(&self) -> LevelExporter {
        LevelExporter::new(self.db.clone())
    }

    /// Delete all ledger data
    pub fn reset_all(&self) -> Result<()> {
        self.db.reset_all()
    }
}
