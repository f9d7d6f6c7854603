use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

/// Data rows sampled when sniffing cell contents for ISIN-shaped tokens.
pub const SNIFF_SAMPLE_ROWS: usize = 50;

/// Two country letters followed by nine alphanumerics and a check digit.
static ISIN_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}[A-Z0-9]{10}$").unwrap());

/// How the ISIN column was determined. Kept on the snapshot so a degraded
/// resolution is visible in diagnostics instead of collapsing to a bare index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnResolution {
    /// A header names the column outright.
    ByHeader(usize),
    /// No header matched; cell contents pointed at the column.
    BySniffing { index: usize, score: usize },
    /// Neither headers nor contents matched; column 0 stands in.
    Fallback(usize),
}

impl ColumnResolution {
    pub fn index(&self) -> usize {
        match *self {
            ColumnResolution::ByHeader(index) => index,
            ColumnResolution::BySniffing { index, .. } => index,
            ColumnResolution::Fallback(index) => index,
        }
    }
}

pub fn looks_like_isin(value: &str) -> bool {
    ISIN_SHAPE.is_match(&value.to_uppercase())
}

/// Determines which column holds the ISIN.
///
/// A header mentioning ISIN settles it, with no look at the cells below it:
/// the header declares intent even when the column holds stale or reformatted
/// codes. Absent such a header the sample rows are scored per column and the
/// first column with the highest count of ISIN-shaped cells wins. Editions
/// have shipped with the header cell blanked out, so the sniffing pass is a
/// required fallback rather than belt-and-braces.
pub fn resolve_isin_column(headers: &[String], rows: &[Vec<String>]) -> ColumnResolution {
    if let Some(index) = headers
        .iter()
        .position(|h| h.to_uppercase().contains("ISIN"))
    {
        return ColumnResolution::ByHeader(index);
    }

    let column_count = if headers.is_empty() {
        rows.first().map(|row| row.len()).unwrap_or(0)
    } else {
        headers.len()
    };

    let mut best_index = 0;
    let mut best_score = 0;
    for col in 0..column_count {
        let score = rows
            .iter()
            .take(SNIFF_SAMPLE_ROWS)
            .filter(|row| row.get(col).map_or(false, |cell| looks_like_isin(cell)))
            .count();
        if score > best_score {
            best_score = score;
            best_index = col;
        }
    }

    if best_score == 0 {
        warn!("no column contains ISIN-shaped values, falling back to column 0");
        ColumnResolution::Fallback(0)
    } else {
        info!(
            "ISIN column sniffed at index {} ({} of {} sampled rows matched)",
            best_index,
            best_score,
            rows.len().min(SNIFF_SAMPLE_ROWS)
        );
        ColumnResolution::BySniffing {
            index: best_index,
            score: best_score,
        }
    }
}
