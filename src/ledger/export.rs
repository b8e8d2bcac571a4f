//! CSV export of player level progress
//!
//! Flat projection joining each PlayerLevel row to its level title and the
//! first prize associated with the level. The scan pages by rowid keyset in
//! fixed-size batches, so memory stays bounded and the connection lock is
//! released between batches while writers proceed.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rusqlite::params;
use tracing::debug;

use super::db::LedgerDb;
use super::error::LedgerError;

/// Rows fetched per batch during an export scan
const EXPORT_BATCH: usize = 1000;

const EXPORT_HEADER: &str = "player_id,level_title,completed,prize_title";

/// One row of the export projection
#[derive(Debug, Clone)]
pub struct ExportRow {
    pub player_id: String,
    pub level_title: String,
    pub completed: bool,
    /// Title of the first prize associated with the level, empty when none
    pub prize_title: String,
}

/// Streams the player-level report to a tabular sink
#[derive(Clone)]
pub struct LevelExporter {
    db: LedgerDb,
}

impl LevelExporter {
    pub fn new(db: LedgerDb) -> Self {
        Self { db }
    }

    /// Write the report as CSV to `sink`.
    ///
    /// One row per PlayerLevel record, in storage insertion order;
    /// `completed` rendered as `true`/`false`. Returns the number of data
    /// rows written.
    pub fn export_csv<W: Write>(&self, sink: &mut W) -> Result<u64, LedgerError> {
        writeln!(sink, "{EXPORT_HEADER}")?;

        let mut rows = 0u64;
        let mut last_rowid = 0i64;
        loop {
            let batch = self.fetch_batch(last_rowid)?;
            if batch.is_empty() {
                break;
            }
            for (rowid, row) in &batch {
                writeln!(
                    sink,
                    "{},{},{},{}",
                    csv_field(&row.player_id),
                    csv_field(&row.level_title),
                    row.completed,
                    csv_field(&row.prize_title)
                )?;
                last_rowid = *rowid;
                rows += 1;
            }
        }
        sink.flush()?;
        debug!(rows, "player level export finished");
        Ok(rows)
    }

    /// Export to a file at `path`, creating parent directories as needed
    pub fn export_csv_file(&self, path: &Path) -> Result<u64, LedgerError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut sink = BufWriter::new(File::create(path)?);
        self.export_csv(&mut sink)
    }

    // One keyset page over player_levels. The lock is held per page only,
    // so a concurrent writer interleaves between pages (best-effort view).
    fn fetch_batch(&self, after_rowid: i64) -> Result<Vec<(i64, ExportRow)>, LedgerError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            r#"
            SELECT pl.rowid, pl.player_id, l.title,
                   pl.completed IS NOT NULL,
                   COALESCE((
                       SELECT p.title FROM level_prizes lp
                       JOIN prizes p ON p.id = lp.prize_id
                       WHERE lp.level_id = pl.level_id
                       ORDER BY lp.rowid LIMIT 1
                   ), '')
            FROM player_levels pl
            JOIN levels l ON l.id = pl.level_id
            WHERE pl.rowid > ?1
            ORDER BY pl.rowid
            LIMIT ?2
            "#,
        )?;
        let batch = stmt
            .query_map(params![after_rowid, EXPORT_BATCH as i64], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    ExportRow {
                        player_id: row.get(1)?,
                        level_title: row.get(2)?,
                        completed: row.get(3)?,
                        prize_title: row.get(4)?,
                    },
                ))
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(batch)
    }
}

/// Quote a CSV field when it contains the delimiter, quotes or newlines
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_plain_values_unquoted() {
        assert_eq!(csv_field("Level 1"), "Level 1");
    }

    #[test]
    fn test_csv_field_quotes_delimiters_and_quotes() {
        assert_eq!(csv_field("Boss, Final"), "\"Boss, Final\"");
        assert_eq!(csv_field("the \"big\" one"), "\"the \"\"big\"\" one\"");
    }
}
