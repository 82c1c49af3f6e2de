//! Reading the emissions CSV into a [`Table`] and writing derived results back out.

use crate::error::{EmissionsError, Result};
use crate::menu::PeriodGrowth;
use crate::models::{CountryTotal, DEFAULT_KEY_COLUMN, Growth, Onset, Row, Share, Table};
use anyhow::Context;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Load a CSV indexed by the `Country` column.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    load_table_with_key(path, DEFAULT_KEY_COLUMN)
}

/// Load a CSV indexed by `key_column`.
///
/// Headers made only of digits are year columns; any other header except the key is
/// kept as a metadata column. Every year cell must be a finite, non-negative number.
pub fn load_table_with_key<P: AsRef<Path>>(path: P, key_column: &str) -> Result<Table> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| EmissionsError::DataAccess(format!("{}: {e}", path.display())))?;

    let headers = rdr.headers()?.clone();
    let key_idx = headers
        .iter()
        .position(|h| h == key_column)
        .ok_or_else(|| {
            EmissionsError::DataAccess(format!(
                "{}: key column '{key_column}' not found",
                path.display()
            ))
        })?;

    let mut year_cols = Vec::new();
    let mut meta_cols = Vec::new();
    for (i, h) in headers.iter().enumerate() {
        if i == key_idx {
            continue;
        }
        if is_year_label(h) {
            year_cols.push(i);
        } else {
            meta_cols.push(i);
        }
    }
    if year_cols.is_empty() {
        return Err(EmissionsError::DataAccess(format!(
            "{}: no year columns",
            path.display()
        )));
    }

    let years: Vec<String> = year_cols.iter().map(|&i| headers[i].to_string()).collect();
    if !is_ascending(&years) {
        log::warn!(
            "{}: year columns are not in ascending order; onset detection follows file order",
            path.display()
        );
    }
    let metadata_columns: Vec<String> = meta_cols.iter().map(|&i| headers[i].to_string()).collect();

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let key = record.get(key_idx).unwrap_or_default().to_string();
        let mut values = Vec::with_capacity(year_cols.len());
        for (&i, year) in year_cols.iter().zip(&years) {
            let cell = record.get(i).unwrap_or_default();
            let bad_cell = |why: &str| {
                EmissionsError::DataAccess(format!(
                    "{}: record {} ('{key}'), year {year}: '{cell}' {why}",
                    path.display(),
                    line + 1
                ))
            };
            let v = cell.parse::<f64>().map_err(|_| bad_cell("is not a number"))?;
            // Tonnages are finite and never negative.
            if !v.is_finite() || v < 0.0 {
                return Err(bad_cell("is not a non-negative finite number"));
            }
            values.push(v);
        }
        let metadata = meta_cols
            .iter()
            .map(|&i| record.get(i).unwrap_or_default().to_string())
            .collect();
        rows.push(Row {
            key,
            values,
            metadata,
        });
    }

    let table = Table::new(key_column, years, metadata_columns, rows)?;
    log::info!(
        "loaded {} rows x {} year columns from {}",
        table.len(),
        table.years().len(),
        path.display()
    );
    Ok(table)
}

fn is_year_label(h: &str) -> bool {
    !h.is_empty() && h.bytes().all(|b| b.is_ascii_digit())
}

fn is_ascending(years: &[String]) -> bool {
    years
        .windows(2)
        .all(|w| match (w[0].parse::<i64>(), w[1].parse::<i64>()) {
            (Ok(a), Ok(b)) => a < b,
            _ => false,
        })
}

/// A derived result that can be written as one CSV line.
pub trait CsvRecord {
    fn header() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

/// Prefix text cells that a spreadsheet would evaluate as a formula.
pub fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{s}"),
        _ => s.to_string(),
    }
}

impl CsvRecord for CountryTotal {
    fn header() -> &'static [&'static str] {
        &["country", "total"]
    }
    fn cells(&self) -> Vec<String> {
        vec![sanitize_cell(&self.country), self.total.to_string()]
    }
}

impl CsvRecord for Onset {
    fn header() -> &'static [&'static str] {
        &["country", "first_positive_year"]
    }
    fn cells(&self) -> Vec<String> {
        vec![sanitize_cell(&self.country), self.year.clone()]
    }
}

impl CsvRecord for Growth {
    fn header() -> &'static [&'static str] {
        &["country", "delta"]
    }
    fn cells(&self) -> Vec<String> {
        vec![sanitize_cell(&self.country), self.delta.to_string()]
    }
}

impl CsvRecord for Share {
    fn header() -> &'static [&'static str] {
        &["country", "fraction"]
    }
    fn cells(&self) -> Vec<String> {
        vec![sanitize_cell(&self.country), self.fraction.to_string()]
    }
}

/// Save records as CSV with header.
pub fn save_csv<T: CsvRecord, P: AsRef<Path>>(records: &[T], path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(T::header())?;
    for r in records {
        wtr.write_record(r.cells())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any serializable value as pretty JSON.
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save records, choosing CSV or JSON from the file extension (CSV when unknown).
pub fn save_records<T, P>(records: &[T], path: P) -> anyhow::Result<()>
where
    T: CsvRecord + Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv")
        .to_ascii_lowercase();
    match ext.as_str() {
        "json" => save_json(records, path),
        _ => save_csv(records, path),
    }
}

/// Save period growth as CSV (one line per period and country) or JSON, by extension.
pub fn save_period_growth<P: AsRef<Path>>(results: &[PeriodGrowth], path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        return save_json(results, path);
    }
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(["period", "start_year", "end_year", "country", "delta"])?;
    for r in results {
        for g in &r.growth {
            wtr.write_record([
                sanitize_cell(&r.period.label),
                r.period.start_label(),
                r.period.end_label(),
                sanitize_cell(&g.country),
                g.delta.to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}
