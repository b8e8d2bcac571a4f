//! Read-side queries over the ledger
//!
//! Relationship navigation is explicit scan-by-foreign-key; scans are
//! ordered by insertion (rowid) so results are reproducible.

use rusqlite::{OptionalExtension, Row, params};

use super::db::LedgerDb;
use super::error::LedgerError;
use super::models::{Boost, BoostType, Level, Player, PlayerBoost, PlayerLevel, PlayerPrize, Prize};

/// Read-only query interface
#[derive(Clone)]
pub struct LedgerQuery {
    db: LedgerDb,
}

impl LedgerQuery {
    pub fn new(db: LedgerDb) -> Self {
        Self { db }
    }

    pub fn get_player(&self, id: &str) -> Result<Option<Player>, LedgerError> {
        let conn = self.db.conn();
        let player = conn
            .query_row(
                "SELECT id, first_login, last_login, points FROM players WHERE id = ?1",
                params![id],
                map_player,
            )
            .optional()?;
        Ok(player)
    }

    pub fn get_boost(&self, id: &str) -> Result<Option<Boost>, LedgerError> {
        let conn = self.db.conn();
        let boost = conn
            .query_row(
                "SELECT id, boost_type, description FROM boosts WHERE id = ?1",
                params![id],
                map_boost,
            )
            .optional()?;
        Ok(boost)
    }

    /// Look up the catalog boost for a kind (unique when present)
    pub fn get_boost_by_type(&self, boost_type: BoostType) -> Result<Option<Boost>, LedgerError> {
        let conn = self.db.conn();
        let boost = conn
            .query_row(
                "SELECT id, boost_type, description FROM boosts WHERE boost_type = ?1",
                params![boost_type.as_str()],
                map_boost,
            )
            .optional()?;
        Ok(boost)
    }

    pub fn get_level(&self, id: &str) -> Result<Option<Level>, LedgerError> {
        let conn = self.db.conn();
        let level = conn
            .query_row(
                "SELECT id, title, sort_order FROM levels WHERE id = ?1",
                params![id],
                map_level,
            )
            .optional()?;
        Ok(level)
    }

    pub fn get_prize(&self, id: &str) -> Result<Option<Prize>, LedgerError> {
        let conn = self.db.conn();
        let prize = conn
            .query_row(
                "SELECT id, title FROM prizes WHERE id = ?1",
                params![id],
                map_prize,
            )
            .optional()?;
        Ok(prize)
    }

    pub fn get_player_boost(
        &self,
        player_id: &str,
        boost_id: &str,
    ) -> Result<Option<PlayerBoost>, LedgerError> {
        let conn = self.db.conn();
        let row = conn
            .query_row(
                "SELECT player_id, boost_id, amount, created_at FROM player_boosts \
                 WHERE player_id = ?1 AND boost_id = ?2",
                params![player_id, boost_id],
                map_player_boost,
            )
            .optional()?;
        Ok(row)
    }

    pub fn get_player_level(
        &self,
        player_id: &str,
        level_id: &str,
    ) -> Result<Option<PlayerLevel>, LedgerError> {
        let conn = self.db.conn();
        let row = conn
            .query_row(
                "SELECT player_id, level_id, completed, score FROM player_levels \
                 WHERE player_id = ?1 AND level_id = ?2",
                params![player_id, level_id],
                map_player_level,
            )
            .optional()?;
        Ok(row)
    }

    /// All boost rows accumulated by a player, in insertion order
    pub fn boosts_for_player(&self, player_id: &str) -> Result<Vec<PlayerBoost>, LedgerError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT player_id, boost_id, amount, created_at FROM player_boosts \
             WHERE player_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map(params![player_id], map_player_boost)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    /// All level result rows for a player, in insertion order
    pub fn levels_for_player(&self, player_id: &str) -> Result<Vec<PlayerLevel>, LedgerError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT player_id, level_id, completed, score FROM player_levels \
             WHERE player_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map(params![player_id], map_player_level)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    /// All prize grants received by a player, in grant order
    pub fn prizes_for_player(&self, player_id: &str) -> Result<Vec<PlayerPrize>, LedgerError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT player_id, prize_id, received_at FROM player_prizes \
             WHERE player_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map(params![player_id], map_player_prize)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    /// Prizes associated with a level, in association insertion order
    pub fn prizes_for_level(&self, level_id: &str) -> Result<Vec<Prize>, LedgerError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT p.id, p.title FROM level_prizes lp \
             JOIN prizes p ON p.id = lp.prize_id \
             WHERE lp.level_id = ?1 ORDER BY lp.rowid",
        )?;
        let rows = stmt
            .query_map(params![level_id], map_prize)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    pub fn list_boosts(&self) -> Result<Vec<Boost>, LedgerError> {
        let conn = self.db.conn();
        let mut stmt =
            conn.prepare("SELECT id, boost_type, description FROM boosts ORDER BY rowid")?;
        let rows = stmt
            .query_map([], map_boost)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    /// Levels ordered by their display order
    pub fn list_levels(&self) -> Result<Vec<Level>, LedgerError> {
        let conn = self.db.conn();
        let mut stmt =
            conn.prepare("SELECT id, title, sort_order FROM levels ORDER BY sort_order, rowid")?;
        let rows = stmt
            .query_map([], map_level)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    pub fn list_prizes(&self) -> Result<Vec<Prize>, LedgerError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare("SELECT id, title FROM prizes ORDER BY rowid")?;
        let rows = stmt
            .query_map([], map_prize)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }

    /// Total number of (player, level) result rows
    pub fn count_player_levels(&self) -> Result<u64, LedgerError> {
        let conn = self.db.conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM player_levels", [], |r| r.get(0))?;
        Ok(count as u64)
    }
}

fn map_player(row: &Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        first_login: row.get(1)?,
        last_login: row.get(2)?,
        points: row.get(3)?,
    })
}

fn map_boost(row: &Row) -> rusqlite::Result<Boost> {
    let raw: String = row.get(1)?;
    let boost_type = BoostType::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown boost type: {raw}").into(),
        )
    })?;
    Ok(Boost {
        id: row.get(0)?,
        boost_type,
        description: row.get(2)?,
    })
}

fn map_level(row: &Row) -> rusqlite::Result<Level> {
    Ok(Level {
        id: row.get(0)?,
        title: row.get(1)?,
        order: row.get(2)?,
    })
}

fn map_prize(row: &Row) -> rusqlite::Result<Prize> {
    Ok(Prize {
        id: row.get(0)?,
        title: row.get(1)?,
    })
}

fn map_player_boost(row: &Row) -> rusqlite::Result<PlayerBoost> {
    Ok(PlayerBoost {
        player_id: row.get(0)?,
        boost_id: row.get(1)?,
        amount: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn map_player_level(row: &Row) -> rusqlite::Result<PlayerLevel> {
    Ok(PlayerLevel {
        player_id: row.get(0)?,
        level_id: row.get(1)?,
        completed: row.get(2)?,
        score: row.get(3)?,
    })
}

fn map_player_prize(row: &Row) -> rusqlite::Result<PlayerPrize> {
    Ok(PlayerPrize {
        player_id: row.get(0)?,
        prize_id: row.get(1)?,
        received_at: row.get(2)?,
    })
}
