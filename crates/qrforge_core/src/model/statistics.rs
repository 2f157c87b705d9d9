//! Daily rollup counters.

use crate::model::qr_code::QrType;

/// One `statistics` row. `date` is a UTC calendar day, `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStatistics {
    pub date: String,
    pub total_qr_codes: i64,
    pub total_views: i64,
    pub most_popular_type: Option<QrType>,
}

impl DailyStatistics {
    /// Zero-valued rollup, used when nothing was recorded yet.
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            total_qr_codes: 0,
            total_views: 0,
            most_popular_type: None,
        }
    }
}
