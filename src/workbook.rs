use crate::error::{LookupError, Result};
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

/// An in-memory xlsx workbook as published by Skat. Opened once per load,
/// consumed for a single sheet, then dropped.
pub struct PositiveListWorkbook {
    inner: Xlsx<Cursor<Vec<u8>>>,
    sheet_names: Vec<String>,
}

impl PositiveListWorkbook {
    pub fn open(bytes: Vec<u8>) -> Result<Self> {
        let inner = Xlsx::new(Cursor::new(bytes))?;
        let sheet_names = inner.sheet_names().to_owned();
        if sheet_names.is_empty() {
            return Err(LookupError::EmptyWorkbook);
        }
        Ok(Self { inner, sheet_names })
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Materializes the raw cell grid of the named sheet, row-major. Rows keep
    /// calamine's scalar cells untouched; stringification happens later in the
    /// extractor.
    pub fn rows(&mut self, name: &str) -> Result<Vec<Vec<Data>>> {
        let range = self.inner.worksheet_range(name)?;
        Ok(range.rows().map(|row| row.to_vec()).collect())
    }
}

/// Picks the sheet carrying the current reporting year. Skat keeps one tab
/// per year and rotates the active one, so: exact match on the current year,
/// else the numerically largest all-digit tab name, else the first tab.
///
/// `names` must be non-empty; `PositiveListWorkbook::open` guarantees that.
pub fn select_sheet<'a>(names: &'a [String], current_year: i32) -> &'a str {
    let year = current_year.to_string();
    if let Some(name) = names.iter().find(|n| n.as_str() == year) {
        return name;
    }

    let mut best: Option<(u64, &str)> = None;
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if let Ok(value) = trimmed.parse::<u64>() {
            if best.map_or(true, |(v, _)| value > v) {
                best = Some((value, name.as_str()));
            }
        }
    }

    best.map(|(_, name)| name).unwrap_or(names[0].as_str())
}
