//! Region filter: views of the table with or without aggregate-region rows.
//!
//! Both key lists are hand-curated. They are deliberately not complements:
//! United Kingdom, United States and Canada are in the region view but are not
//! removed from the country view.

use crate::error::Result;
use crate::models::{FilterMode, Table};

/// Rows removed by [`FilterMode::CountriesOnly`]. The misspelling matches the dataset.
pub const AGGREGATE_REGION_KEYS: [&str; 9] = [
    "World",
    "Africa",
    "Americas (other)",
    "Asia and Pacific (other)",
    "Australia",
    "EU-28",
    "Europe (other)",
    "Kyrgysztan",
    "Middle East",
];

/// Rows kept, in this order, by [`FilterMode::RegionsOnly`].
pub const REGION_VIEW_KEYS: [&str; 9] = [
    "Africa",
    "Americas (other)",
    "Asia and Pacific (other)",
    "Australia",
    "EU-28",
    "Europe (other)",
    "United Kingdom",
    "United States",
    "Canada",
];

/// Apply `mode` to `table`.
///
/// Filtering a view with the mode that produced it returns it unchanged. Otherwise a
/// listed key that is missing from the table fails with `MissingKey`.
pub fn filter(table: &Table, mode: FilterMode) -> Result<Table> {
    if table.view() == mode {
        return Ok(table.clone());
    }
    let view = match mode {
        FilterMode::All => return Ok(table.clone()),
        FilterMode::CountriesOnly => table.without(&AGGREGATE_REGION_KEYS)?,
        FilterMode::RegionsOnly => table.select(&REGION_VIEW_KEYS)?,
    };
    log::debug!("filter {mode}: {} -> {} rows", table.len(), view.len());
    Ok(view.with_view(mode))
}

/// Apply a raw numeric filter ID. Unknown IDs fall back to the full table with a warning.
pub fn filter_by_id(table: &Table, id: i64) -> Result<Table> {
    filter(table, FilterMode::from_id(id))
}
