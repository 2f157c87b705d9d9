//! Daily statistics use-cases.

use crate::model::statistics::DailyStatistics;
use crate::repo::stats_repo::StatisticsRepository;
use crate::repo::RepoResult;
use crate::timestamp::{now_epoch_ms, utc_date};
use log::debug;

/// Statistics service facade.
pub struct StatisticsService<S: StatisticsRepository> {
    repo: S,
}

impl<S: StatisticsRepository> StatisticsService<S> {
    pub fn new(repo: S) -> Self {
        Self { repo }
    }

    /// Counts a QR code generated at `created_at_ms`.
    pub fn record_generation(&self, created_at_ms: i64) -> RepoResult<DailyStatistics> {
        let stats = self.repo.record_generation(&utc_date(created_at_ms))?;
        debug!(
            "event=stats_generation module=service status=ok date={} total={}",
            stats.date, stats.total_qr_codes
        );
        Ok(stats)
    }

    /// Counts a QR view at `viewed_at_ms`.
    pub fn record_view(&self, viewed_at_ms: i64) -> RepoResult<DailyStatistics> {
        self.repo.record_view(&utc_date(viewed_at_ms))
    }

    /// Latest rollup, or a zero row for today when nothing was recorded.
    pub fn latest(&self) -> RepoResult<DailyStatistics> {
        Ok(self
            .repo
            .latest()?
            .unwrap_or_else(|| DailyStatistics::empty(utc_date(now_epoch_ms()))))
    }
}
