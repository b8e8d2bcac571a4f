//! Catalog bootstrap and player onboarding
//!
//! Creates the immutable catalog rows (boosts, levels, prizes and their
//! level associations) plus player accounts, and deletes parents together
//! with their cascaded association rows.

use rusqlite::params;

use super::db::LedgerDb;
use super::error::{LedgerError, resolve_missing_ref};
use super::models::{Boost, BoostType, Level, LevelPrize, Player, Prize};

/// Writes catalog and player records
#[derive(Clone)]
pub struct Catalog {
    db: LedgerDb,
}

impl Catalog {
    pub fn new(db: LedgerDb) -> Self {
        Self { db }
    }

    /// Create a new player account
    pub fn create_player(&self) -> Result<Player, LedgerError> {
        let player = Player::new();
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO players (id, first_login, last_login, points) VALUES (?1, ?2, ?3, ?4)",
            params![
                player.id,
                player.first_login,
                player.last_login,
                player.points
            ],
        )
        .map_err(LedgerError::from_sqlite)?;
        Ok(player)
    }

    /// Create the catalog boost for a kind; each kind exists at most once
    pub fn create_boost(&self, boost_type: BoostType) -> Result<Boost, LedgerError> {
        let boost = Boost::new(boost_type);
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO boosts (id, boost_type, description) VALUES (?1, ?2, ?3)",
            params![boost.id, boost.boost_type.as_str(), boost.description],
        )
        .map_err(LedgerError::from_sqlite)?;
        Ok(boost)
    }

    /// Create a level; `order` is a display/sequencing hint only
    pub fn create_level(&self, title: &str, order: i64) -> Result<Level, LedgerError> {
        let level = Level::new(title, order);
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO levels (id, title, sort_order) VALUES (?1, ?2, ?3)",
            params![level.id, level.title, level.order],
        )
        .map_err(LedgerError::from_sqlite)?;
        Ok(level)
    }

    /// Create a catalog prize
    pub fn create_prize(&self, title: &str) -> Result<Prize, LedgerError> {
        let prize = Prize::new(title);
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO prizes (id, title) VALUES (?1, ?2)",
            params![prize.id, prize.title],
        )
        .map_err(LedgerError::from_sqlite)?;
        Ok(prize)
    }

    /// Associate a prize with a level, to be granted on completion
    pub fn attach_prize(&self, level_id: &str, prize_id: &str) -> Result<LevelPrize, LedgerError> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO level_prizes (level_id, prize_id) VALUES (?1, ?2)",
            params![level_id, prize_id],
        )
        .map_err(|err| {
            resolve_missing_ref(
                &conn,
                &[("level", "levels", level_id), ("prize", "prizes", prize_id)],
                err,
            )
        })?;
        Ok(LevelPrize {
            level_id: level_id.to_string(),
            prize_id: prize_id.to_string(),
        })
    }

    /// Delete a player; boost, level and prize rows cascade
    pub fn delete_player(&self, id: &str) -> Result<(), LedgerError> {
        self.delete_from("players", "player", id)
    }

    /// Delete a catalog boost; accumulated player boosts cascade
    pub fn delete_boost(&self, id: &str) -> Result<(), LedgerError> {
        self.delete_from("boosts", "boost", id)
    }

    /// Delete a level; prize associations and player progress cascade
    pub fn delete_level(&self, id: &str) -> Result<(), LedgerError> {
        self.delete_from("levels", "level", id)
    }

    /// Delete a catalog prize; associations and grants cascade
    pub fn delete_prize(&self, id: &str) -> Result<(), LedgerError> {
        self.delete_from("prizes", "prize", id)
    }

    fn delete_from(
        &self,
        table: &'static str,
        entity: &'static str,
        id: &str,
    ) -> Result<(), LedgerError> {
        let conn = self.db.conn();
        let deleted = conn
            .execute(&format!("DELETE FROM {table} WHERE id = ?1"), params![id])
            .map_err(LedgerError::from_sqlite)?;
        if deleted == 0 {
            return Err(LedgerError::not_found(entity, id));
        }
        Ok(())
    }
}
