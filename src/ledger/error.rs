//! Error taxonomy for ledger operations

use rusqlite::ffi;

/// Error type for ledger operations
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A CHECK or uniqueness constraint rejected the write
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// A referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Underlying storage failure
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),

    /// Export sink failure
    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Classify a SQLite failure into the ledger taxonomy.
    ///
    /// CHECK, UNIQUE and PRIMARY KEY violations become
    /// `ConstraintViolation`; everything else passes through as `Storage`.
    /// Foreign-key failures are resolved separately (see
    /// [`resolve_missing_ref`]) because they name a missing record.
    pub(crate) fn from_sqlite(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref cause, ref message) = err {
            match cause.extended_code {
                ffi::SQLITE_CONSTRAINT_CHECK
                | ffi::SQLITE_CONSTRAINT_UNIQUE
                | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    let detail = message.clone().unwrap_or_else(|| cause.to_string());
                    return Self::ConstraintViolation(detail);
                }
                _ => {}
            }
        }
        Self::Storage(err)
    }
}

/// Whether a SQLite error is a foreign-key constraint failure
fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(cause, _)
            if cause.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

/// Resolve a foreign-key failure to the specific missing reference.
///
/// SQLite does not report which reference a foreign-key error is about, so
/// each `(entity, table, id)` candidate is probed in order and the first id
/// with no row is reported as `NotFound`. Non-FK errors go through the
/// usual classification.
pub(crate) fn resolve_missing_ref(
    conn: &rusqlite::Connection,
    refs: &[(&'static str, &'static str, &str)],
    err: rusqlite::Error,
) -> LedgerError {
    if is_foreign_key_violation(&err) {
        for &(entity, table, id) in refs {
            let found: bool = conn
                .query_row(
                    &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
                    rusqlite::params![id],
                    |r| r.get(0),
                )
                .unwrap_or(false);
            if !found {
                return LedgerError::not_found(entity, id);
            }
        }
    }
    LedgerError::from_sqlite(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_violation_is_classified() {
        let err = rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_CONSTRAINT_CHECK),
            Some("CHECK constraint failed: amount >= 0".to_string()),
        );
        let classified = LedgerError::from_sqlite(err);
        assert!(matches!(classified, LedgerError::ConstraintViolation(_)));
    }

    #[test]
    fn test_other_failures_pass_through() {
        let err = rusqlite::Error::SqliteFailure(ffi::Error::new(ffi::SQLITE_BUSY), None);
        let classified = LedgerError::from_sqlite(err);
        assert!(matches!(classified, LedgerError::Storage(_)));
    }
}
