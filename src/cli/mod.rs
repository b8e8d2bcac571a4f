//! CLI command implementations

pub mod export;
pub mod seed;
pub mod show;
