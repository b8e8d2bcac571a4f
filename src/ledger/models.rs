//! Record models for the progression ledger
//!
//! These structures mirror the rows stored in the ledger database. Ids are
//! v4 UUIDs stored as text; timestamps are ms since the Unix epoch.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of boost kinds, each with a fixed description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostType {
    DoublePoints,
    Speed,
    Shield,
}

impl BoostType {
    /// All catalog boost kinds, in bootstrap order
    pub const ALL: [BoostType; 3] = [Self::DoublePoints, Self::Speed, Self::Shield];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DoublePoints => "double_points",
            Self::Speed => "speed",
            Self::Shield => "shield",
        }
    }

    /// Human-readable description attached to the kind
    pub fn description(&self) -> &'static str {
        match self {
            Self::DoublePoints => "x2 points earned",
            Self::Speed => "movement speed boost",
            Self::Shield => "shield against losses",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "double_points" => Some(Self::DoublePoints),
            "speed" => Some(Self::Speed),
            "shield" => Some(Self::Shield),
            _ => None,
        }
    }
}

/// A player account with login bookkeeping and accrued points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    /// None until the very first login
    pub first_login: Option<i64>,
    pub last_login: Option<i64>,
    pub points: i64,
}

impl Player {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            first_login: None,
            last_login: None,
            points: 0,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog entry for a boost kind; not a per-player grant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boost {
    pub id: String,
    pub boost_type: BoostType,
    pub description: String,
}

impl Boost {
    /// Create a catalog boost carrying the kind's fixed description
    pub fn new(boost_type: BoostType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            boost_type,
            description: boost_type.description().to_string(),
        }
    }
}

/// A playable level; `order` is a display hint, not a completion gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub title: String,
    pub order: i64,
}

impl Level {
    pub fn new(title: &str, order: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            order,
        }
    }
}

/// Catalog entry for a prize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prize {
    pub id: String,
    pub title: String,
}

impl Prize {
    pub fn new(title: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
        }
    }
}

/// Accumulated quantity of one boost kind held by a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBoost {
    pub player_id: String,
    pub boost_id: String,
    pub amount: i64,
    pub created_at: i64,
}

/// Declares that a level awards a prize on completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelPrize {
    pub level_id: String,
    pub prize_id: String,
}

/// Progress of one player on one level; mutated in place on re-attempts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerLevel {
    pub player_id: String,
    pub level_id: String,
    /// Completion timestamp; None while the level is incomplete
    pub completed: Option<i64>,
    pub score: i64,
}

impl PlayerLevel {
    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }
}

/// A single prize grant event; at most one per (player, prize)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPrize {
    pub player_id: String,
    pub prize_id: String,
    pub received_at: i64,
}
