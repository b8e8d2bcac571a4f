//! Progression engine - the stateful player operations
//!
//! Three operations, each scoped to one player: daily-login point accrual,
//! boost accumulation, and level-completion prize grants. Writes go through
//! single-statement upserts, or hold the connection lock across the whole
//! read-modify-write, so repeated and concurrent calls for the same player
//! keep the accumulation and at-most-once invariants.

use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use tracing::debug;

use super::db::LedgerDb;
use super::error::{LedgerError, resolve_missing_ref};
use super::models::{Player, PlayerBoost};
use super::time_bucket::day_bucket;

/// Points credited on the first login of each UTC day
pub const DAILY_LOGIN_BONUS: i64 = 10;

/// Executes the player-scoped progression operations
#[derive(Clone)]
pub struct ProgressionEngine {
    db: LedgerDb,
}

impl ProgressionEngine {
    pub fn new(db: LedgerDb) -> Self {
        Self { db }
    }

    /// Record a login for the player.
    ///
    /// Sets `first_login` on the first call ever, credits the daily bonus
    /// when `last_login` is unset or falls on an earlier UTC day, and always
    /// refreshes `last_login`. A repeated login on the same day never
    /// credits twice. Returns the updated player row.
    pub fn login(&self, player_id: &str) -> Result<Player, LedgerError> {
        let now = Utc::now().timestamp_millis();

        // One lock acquisition covers the read and the write, so two
        // same-day logins cannot both observe a stale last_login.
        let conn = self.db.conn();
        let player = conn
            .query_row(
                "SELECT id, first_login, last_login, points FROM players WHERE id = ?1",
                params![player_id],
                |row| {
                    Ok(Player {
                        id: row.get(0)?,
                        first_login: row.get(1)?,
                        last_login: row.get(2)?,
                        points: row.get(3)?,
                    })
                },
            )
            .optional()?;
        let mut player = player.ok_or_else(|| LedgerError::not_found("player", player_id))?;

        let first_of_day = player
            .last_login
            .is_none_or(|last| day_bucket(last) < day_bucket(now));
        if first_of_day {
            player.points += DAILY_LOGIN_BONUS;
        }
        player.first_login = player.first_login.or(Some(now));
        player.last_login = Some(now);

        conn.execute(
            "UPDATE players SET first_login = ?2, last_login = ?3, points = ?4 WHERE id = ?1",
            params![
                player.id,
                player.first_login,
                player.last_login,
                player.points
            ],
        )
        .map_err(LedgerError::from_sqlite)?;

        debug!(player = %player.id, credited = first_of_day, points = player.points, "login recorded");
        Ok(player)
    }

    /// Accumulate `amount` of a catalog boost for the player.
    ///
    /// Upsert-with-increment: the first grant creates the row, later grants
    /// add to it; exactly one row per (player, boost) pair ever exists.
    /// `amount` must be non-negative. Returns the row after accumulation.
    pub fn add_boost(
        &self,
        player_id: &str,
        boost_id: &str,
        amount: i64,
    ) -> Result<PlayerBoost, LedgerError> {
        if amount < 0 {
            return Err(LedgerError::ConstraintViolation(format!(
                "boost amount must be non-negative, got {amount}"
            )));
        }
        let now = Utc::now().timestamp_millis();

        let conn = self.db.conn();
        conn.execute(
            r#"INSERT INTO player_boosts (player_id, boost_id, amount, created_at)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(player_id, boost_id) DO UPDATE SET amount = amount + ?3"#,
            params![player_id, boost_id, amount, now],
        )
        .map_err(|err| {
            resolve_missing_ref(
                &conn,
                &[
                    ("player", "players", player_id),
                    ("boost", "boosts", boost_id),
                ],
                err,
            )
        })?;

        let row = conn.query_row(
            "SELECT player_id, boost_id, amount, created_at FROM player_boosts \
             WHERE player_id = ?1 AND boost_id = ?2",
            params![player_id, boost_id],
            |row| {
                Ok(PlayerBoost {
                    player_id: row.get(0)?,
                    boost_id: row.get(1)?,
                    amount: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )?;
        debug!(player = %player_id, boost = %boost_id, amount = row.amount, "boost accumulated");
        Ok(row)
    }

    /// Upsert the player's result row for a level (phase one of completion).
    ///
    /// Re-submission overwrites `completed` and `score` in place; the
    /// (player, level) row is never duplicated. `score` must be
    /// non-negative.
    pub fn record_level_result(
        &self,
        player_id: &str,
        level_id: &str,
        completed: Option<i64>,
        score: i64,
    ) -> Result<(), LedgerError> {
        if score < 0 {
            return Err(LedgerError::ConstraintViolation(format!(
                "level score must be non-negative, got {score}"
            )));
        }

        let conn = self.db.conn();
        conn.execute(
            r#"INSERT INTO player_levels (player_id, level_id, completed, score)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(player_id, level_id) DO UPDATE SET completed = ?3, score = ?4"#,
            params![player_id, level_id, completed, score],
        )
        .map_err(|err| {
            resolve_missing_ref(
                &conn,
                &[
                    ("player", "players", player_id),
                    ("level", "levels", level_id),
                ],
                err,
            )
        })?;
        Ok(())
    }

    /// Grant the player every prize attached to a completed level (phase two).
    ///
    /// A level with no result row, or one not yet completed, grants nothing
    /// and is not an error. Each prize is granted at most once per player;
    /// re-invocation skips rows that already exist. Grants apply prize by
    /// prize, so a retry after a mid-loop failure picks up where it left
    /// off. Returns the prize ids granted by this call, in association
    /// insertion order.
    pub fn grant_level_prizes(
        &self,
        player_id: &str,
        level_id: &str,
    ) -> Result<Vec<String>, LedgerError> {
        let now = Utc::now().timestamp_millis();
        let conn = self.db.conn();

        let completed: Option<Option<i64>> = conn
            .query_row(
                "SELECT completed FROM player_levels WHERE player_id = ?1 AND level_id = ?2",
                params![player_id, level_id],
                |row| row.get(0),
            )
            .optional()?;
        if !matches!(completed, Some(Some(_))) {
            return Ok(Vec::new());
        }

        let mut stmt =
            conn.prepare("SELECT prize_id FROM level_prizes WHERE level_id = ?1 ORDER BY rowid")?;
        let prize_ids: Vec<String> = stmt
            .query_map(params![level_id], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();
        drop(stmt);

        let mut granted = Vec::new();
        for prize_id in prize_ids {
            let inserted = conn
                .execute(
                    "INSERT OR IGNORE INTO player_prizes (player_id, prize_id, received_at) \
                     VALUES (?1, ?2, ?3)",
                    params![player_id, prize_id, now],
                )
                .map_err(LedgerError::from_sqlite)?;
            if inserted > 0 {
                debug!(player = %player_id, prize = %prize_id, "prize granted");
                granted.push(prize_id);
            }
        }
        Ok(granted)
    }

    /// Record a completed level with the given score, then grant its prizes.
    pub fn complete_level(
        &self,
        player_id: &str,
        level_id: &str,
        score: i64,
    ) -> Result<Vec<String>, LedgerError> {
        let now = Utc::now().timestamp_millis();
        self.record_level_result(player_id, level_id, Some(now), score)?;
        self.grant_level_prizes(player_id, level_id)
    }
}
