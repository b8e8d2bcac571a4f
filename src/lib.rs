//! Questline - player progression and reward ledger
//!
//! Players earn points for daily logins, accumulate stackable boosts,
//! complete ordered levels and receive the prizes tied to them. A prize is
//! never granted twice, boosts accumulate into a single row per player and
//! kind, and re-attempting a level mutates its row in place. All state
//! lives in a SQLite database (`~/.questline/ledger.db` by default).
//!
//! Catalog bootstrap, demo data seeding and CSV export are driven by the
//! `questline` binary; applications embed [`LedgerManager`] directly.

pub mod config;
pub mod ledger;

pub use ledger::*;
