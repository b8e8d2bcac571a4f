//! Filesystem locations for questline data

use std::path::PathBuf;

/// Get the global data directory path (~/.questline/)
pub fn global_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".questline")
}

/// Get the default ledger database path (~/.questline/ledger.db)
pub fn default_db_path() -> PathBuf {
    global_data_dir().join("ledger.db")
}
