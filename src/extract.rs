use calamine::Data;
use tracing::{debug, warn};

/// Rows scanned from the top of the sheet when hunting for the header row.
/// The published list carries a preamble of title/legend rows of varying
/// length; 30 has covered every edition seen so far.
pub const HEADER_SCAN_ROWS: usize = 30;

/// A rectangular, fully stringified view of the selected sheet.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Collapses a raw cell into the single string form used everywhere past this
/// point. Whitespace-only text counts as blank.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            // Excel stores most numerics as floats; render whole values
            // without a trailing ".0" so codes like 1234 survive intact.
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(e) => e.to_string(),
    }
}

/// First row within the scan window where any cell mentions ISIN, in any
/// casing. The publisher has moved the header around between editions, so
/// this is detected rather than assumed.
fn find_header_row(rows: &[Vec<Data>]) -> Option<usize> {
    rows.iter().take(HEADER_SCAN_ROWS).position(|row| {
        row.iter()
            .any(|cell| cell_text(cell).to_uppercase().contains("ISIN"))
    })
}

/// Materializes headers and data rows from a raw sheet grid.
///
/// Rows strictly after the header row become data; fully blank rows are
/// dropped and the remaining rows keep sheet order. A missing ISIN marker is
/// degraded operation, not a failure: row 0 serves as the header and the
/// condition is logged.
pub fn extract_table(rows: &[Vec<Data>]) -> Table {
    for (i, row) in rows.iter().take(10).enumerate() {
        let non_empty: Vec<String> = row
            .iter()
            .map(cell_text)
            .filter(|text| !text.is_empty())
            .collect();
        debug!("row {}: {:?}", i, non_empty);
    }

    let header_idx = match find_header_row(rows) {
        Some(idx) => {
            debug!("ISIN marker found in row {}", idx);
            idx
        }
        None => {
            warn!(
                "ISIN not found in first {} rows, defaulting to row 0",
                HEADER_SCAN_ROWS
            );
            0
        }
    };

    let headers: Vec<String> = rows
        .get(header_idx)
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();

    let data_rows: Vec<Vec<String>> = rows
        .iter()
        .skip(header_idx + 1)
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>())
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    Table {
        headers,
        rows: data_rows,
    }
}
