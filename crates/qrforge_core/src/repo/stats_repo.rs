//! Daily statistics rollup storage.
//!
//! # Invariants
//! - At most one row per UTC day (`statistics.date` is unique).
//! - `most_popular_type` is derived from `qr_codes` created on that day;
//!   ties resolve to the alphabetically smallest type label.

use crate::model::qr_code::QrType;
use crate::model::statistics::DailyStatistics;
use crate::repo::{ensure_tables, RepoError, RepoResult};
use rusqlite::{Connection, OptionalExtension, Row};

const STATS_SELECT_SQL: &str =
    "SELECT date, total_qr_codes, total_views, most_popular_type FROM statistics";

/// Repository interface for the daily rollup.
pub trait StatisticsRepository {
    /// Counts one generated code on `date` and refreshes the popular type.
    fn record_generation(&self, date: &str) -> RepoResult<DailyStatistics>;
    /// Counts one QR view on `date`.
    fn record_view(&self, date: &str) -> RepoResult<DailyStatistics>;
    fn for_date(&self, date: &str) -> RepoResult<Option<DailyStatistics>>;
    /// Most recent day with a row.
    fn latest(&self) -> RepoResult<Option<DailyStatistics>>;
}

/// SQLite-backed statistics repository.
pub struct SqliteStatisticsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStatisticsRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["statistics", "qr_codes"])?;
        Ok(Self { conn })
    }

    fn require_date(&self, date: &str) -> RepoResult<DailyStatistics> {
        self.for_date(date)?.ok_or_else(|| {
            RepoError::InvalidData(format!("statistics row for `{date}` vanished after upsert"))
        })
    }
}

impl StatisticsRepository for SqliteStatisticsRepository<'_> {
    fn record_generation(&self, date: &str) -> RepoResult<DailyStatistics> {
        self.conn.execute(
            "INSERT INTO statistics (date, total_qr_codes) VALUES (?1, 1)
             ON CONFLICT(date) DO UPDATE SET total_qr_codes = total_qr_codes + 1;",
            [date],
        )?;
        self.conn.execute(
            "UPDATE statistics
             SET most_popular_type = (
                SELECT type
                FROM qr_codes
                WHERE date(created_at / 1000, 'unixepoch') = ?1
                GROUP BY type
                ORDER BY COUNT(*) DESC, type ASC
                LIMIT 1
             )
             WHERE date = ?1;",
            [date],
        )?;
        self.require_date(date)
    }

    fn record_view(&self, date: &str) -> RepoResult<DailyStatistics> {
        self.conn.execute(
            "INSERT INTO statistics (date, total_views) VALUES (?1, 1)
             ON CONFLICT(date) DO UPDATE SET total_views = total_views + 1;",
            [date],
        )?;
        self.require_date(date)
    }

    fn for_date(&self, date: &str) -> RepoResult<Option<DailyStatistics>> {
        let row = self
            .conn
            .query_row(
                &format!("{STATS_SELECT_SQL} WHERE date = ?1;"),
                [date],
                read_stats_row,
            )
            .optional()?;
        row.map(into_statistics).transpose()
    }

    fn latest(&self) -> RepoResult<Option<DailyStatistics>> {
        let row = self
            .conn
            .query_row(
                &format!("{STATS_SELECT_SQL} ORDER BY date DESC LIMIT 1;"),
                [],
                read_stats_row,
            )
            .optional()?;
        row.map(into_statistics).transpose()
    }
}

type StatsRow = (String, i64, i64, Option<String>);

fn read_stats_row(row: &Row<'_>) -> rusqlite::Result<StatsRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_statistics((date, total_qr_codes, total_views, popular): StatsRow) -> RepoResult<DailyStatistics> {
    let most_popular_type = match popular {
        Some(label) => Some(QrType::parse(&label).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid qr type `{label}` in statistics.most_popular_type"
            ))
        })?),
        None => None,
    };
    Ok(DailyStatistics {
        date,
        total_qr_codes,
        total_views,
        most_popular_type,
    })
}
