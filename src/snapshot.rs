use crate::resolve::ColumnResolution;
use chrono::{DateTime, Utc};

/// One fully parsed edition of the positive list.
///
/// Built in a single pipeline run and shared behind an `Arc`; nothing mutates
/// it afterwards, so request handlers may keep a reference across their whole
/// span while a reload swaps in a successor.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Name of the workbook sheet the data came from.
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Column lookups scan. Always populated by the permissive resolver;
    /// stays an Option so a stricter pipeline can withhold it.
    pub isin_column: Option<usize>,
    /// How `isin_column` was arrived at.
    pub resolution: ColumnResolution,
    pub loaded_at: DateTime<Utc>,
}
