use crate::error::{EmissionsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Key of the global pseudo-country. It is a sum of every other row.
pub const WORLD_KEY: &str = "World";
/// Name of the index column in the published emissions dataset.
pub const DEFAULT_KEY_COLUMN: &str = "Country";
/// Size of the top/bottom selections.
pub const DEFAULT_SELECTION: usize = 10;
/// Year whose World value normalizes the share view.
pub const DEFAULT_REFERENCE_YEAR: &str = "2017";
/// Number of rows printed by the dataset overview.
pub const DEFAULT_HEAD_ROWS: usize = 30;

/// Which rows a filtered view keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FilterMode {
    /// Every row, aggregates included.
    #[default]
    All,
    /// Individual countries; the aggregate-region rows are dropped.
    CountriesOnly,
    /// Only the curated region/large-emitter rows.
    RegionsOnly,
}

impl FilterMode {
    /// Map a numeric filter ID (0, 1, 2). Unknown IDs degrade to `All` with a warning.
    pub fn from_id(id: i64) -> FilterMode {
        match id {
            0 => FilterMode::All,
            1 => FilterMode::CountriesOnly,
            2 => FilterMode::RegionsOnly,
            other => {
                log::warn!("invalid filter id {other}; falling back to the unfiltered table");
                FilterMode::All
            }
        }
    }

    pub fn id(self) -> i64 {
        match self {
            FilterMode::All => 0,
            FilterMode::CountriesOnly => 1,
            FilterMode::RegionsOnly => 2,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterMode::All => "all",
            FilterMode::CountriesOnly => "countries",
            FilterMode::RegionsOnly => "regions",
        };
        f.write_str(s)
    }
}

/// Sort direction for ranked selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Largest totals first.
    Top,
    /// Smallest totals first.
    Bottom,
}

/// One row of the table: a country (or region) and its per-year values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub key: String,
    /// One value per year column, in the table's column order.
    pub values: Vec<f64>,
    /// Non-year cells, in the table's metadata column order.
    pub metadata: Vec<String>,
}

impl Row {
    pub fn new(key: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            key: key.into(),
            values,
            metadata: Vec::new(),
        }
    }
}

/// In-memory emissions table indexed by country name.
///
/// Immutable once built: filtering and selection produce new tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    key_column: String,
    years: Vec<String>,
    metadata_columns: Vec<String>,
    rows: Vec<Row>,
    index: HashMap<String, usize>,
    view: FilterMode,
}

impl Table {
    /// Build a table, checking the full-coverage invariant and key uniqueness.
    pub fn new(
        key_column: impl Into<String>,
        years: Vec<String>,
        metadata_columns: Vec<String>,
        rows: Vec<Row>,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.values.len() != years.len() {
                return Err(EmissionsError::DataAccess(format!(
                    "row '{}' has {} year values, expected {}",
                    row.key,
                    row.values.len(),
                    years.len()
                )));
            }
            if row.metadata.len() != metadata_columns.len() {
                return Err(EmissionsError::DataAccess(format!(
                    "row '{}' has {} metadata cells, expected {}",
                    row.key,
                    row.metadata.len(),
                    metadata_columns.len()
                )));
            }
            if index.insert(row.key.clone(), i).is_some() {
                return Err(EmissionsError::DataAccess(format!(
                    "duplicate key '{}'",
                    row.key
                )));
            }
        }
        Ok(Self {
            key_column: key_column.into(),
            years,
            metadata_columns,
            rows,
            index,
            view: FilterMode::All,
        })
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    /// Year column labels in the file's (chronological) order.
    pub fn years(&self) -> &[String] {
        &self.years
    }

    pub fn metadata_columns(&self) -> &[String] {
        &self.metadata_columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The filter mode that produced this view (`All` for a freshly loaded table).
    pub fn view(&self) -> FilterMode {
        self.view
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column count as the file header shows it (key + metadata + years).
    pub fn column_count(&self) -> usize {
        1 + self.metadata_columns.len() + self.years.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.key.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn row(&self, key: &str) -> Option<&Row> {
        self.index.get(key).map(|&i| &self.rows[i])
    }

    pub fn year_index(&self, year: &str) -> Option<usize> {
        self.years.iter().position(|y| y == year)
    }

    /// Exact (key, year) lookup.
    pub fn value(&self, key: &str, year: &str) -> Result<f64> {
        let row = self
            .row(key)
            .ok_or_else(|| EmissionsError::MissingKey(key.to_string()))?;
        let col = self
            .year_index(year)
            .ok_or_else(|| EmissionsError::MissingColumn(year.to_string()))?;
        Ok(row.values[col])
    }

    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// New table holding exactly `keys`, in the order given.
    pub fn select<S: AsRef<str>>(&self, keys: &[S]) -> Result<Table> {
        let mut rows = Vec::with_capacity(keys.len());
        let mut seen = HashSet::new();
        for key in keys {
            let key = key.as_ref();
            let row = self
                .row(key)
                .ok_or_else(|| EmissionsError::MissingKey(key.to_string()))?;
            if seen.insert(key) {
                rows.push(row.clone());
            }
        }
        self.derive(rows)
    }

    /// New table with `keys` removed. Every key must be present.
    pub fn without<S: AsRef<str>>(&self, keys: &[S]) -> Result<Table> {
        let mut drop = HashSet::new();
        for key in keys {
            let key = key.as_ref();
            if !self.contains_key(key) {
                return Err(EmissionsError::MissingKey(key.to_string()));
            }
            drop.insert(key);
        }
        let rows = self
            .rows
            .iter()
            .filter(|r| !drop.contains(r.key.as_str()))
            .cloned()
            .collect();
        self.derive(rows)
    }

    pub(crate) fn with_view(mut self, view: FilterMode) -> Table {
        self.view = view;
        self
    }

    fn derive(&self, rows: Vec<Row>) -> Result<Table> {
        Table::new(
            self.key_column.clone(),
            self.years.clone(),
            self.metadata_columns.clone(),
            rows,
        )
    }
}

/// Summed emissions of one country over every year column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryTotal {
    pub country: String,
    pub total: f64,
}

/// First year a country's emissions exceeded zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Onset {
    pub country: String,
    pub year: String,
}

/// Net change of a country's emissions between the ends of a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    pub country: String,
    pub delta: f64,
}

/// A country's total as a fraction of the World value for a reference year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub country: String,
    pub fraction: f64,
}

/// Named historical window used by the growth view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub label: String,
    pub start_year: i32,
    pub end_year: i32,
}

impl TimePeriod {
    pub fn new(label: impl Into<String>, start_year: i32, end_year: i32) -> Self {
        Self {
            label: label.into(),
            start_year,
            end_year,
        }
    }

    /// US industrialization: five years before 1790 until fifty years after.
    pub fn industrial_revolution_us() -> Self {
        Self::new("Industrial Revolution US", 1790 - 5, 1790 + 50)
    }

    /// Five years either side of 1914-1918.
    pub fn wwi() -> Self {
        Self::new("WWI", 1914 - 5, 1918 + 5)
    }

    /// Five years either side of 1939-1945.
    pub fn wwii() -> Self {
        Self::new("WWII", 1939 - 5, 1945 + 5)
    }

    pub fn modern_era() -> Self {
        Self::new("Modern Era (End of WWII-2017)", 1951, 2017)
    }

    pub fn presets() -> [TimePeriod; 4] {
        [
            Self::industrial_revolution_us(),
            Self::wwi(),
            Self::wwii(),
            Self::modern_era(),
        ]
    }

    /// Preset behind a menu choice (`"1"`..`"4"`).
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(Self::industrial_revolution_us()),
            "2" => Some(Self::wwi()),
            "3" => Some(Self::wwii()),
            "4" => Some(Self::modern_era()),
            _ => None,
        }
    }

    pub fn start_label(&self) -> String {
        self.start_year.to_string()
    }

    pub fn end_label(&self) -> String {
        self.end_year.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rejects_short_rows_and_duplicate_keys() {
        let short = Table::new(
            "Country",
            years(&["1", "2"]),
            Vec::new(),
            vec![Row::new("A", vec![1.0])],
        );
        assert!(matches!(short, Err(EmissionsError::DataAccess(_))));

        let dup = Table::new(
            "Country",
            years(&["1"]),
            Vec::new(),
            vec![Row::new("A", vec![1.0]), Row::new("A", vec![2.0])],
        );
        assert!(matches!(dup, Err(EmissionsError::DataAccess(_))));
    }

    #[test]
    fn select_keeps_requested_order() {
        let t = Table::new(
            "Country",
            years(&["1"]),
            Vec::new(),
            vec![
                Row::new("A", vec![1.0]),
                Row::new("B", vec![2.0]),
                Row::new("C", vec![3.0]),
            ],
        )
        .unwrap();
        let s = t.select(&["C", "A"]).unwrap();
        assert_eq!(s.keys().collect::<Vec<_>>(), vec!["C", "A"]);
        assert!(matches!(
            t.select(&["Z"]),
            Err(EmissionsError::MissingKey(k)) if k == "Z"
        ));
    }

    #[test]
    fn presets_match_menu_choices() {
        let p = TimePeriod::from_choice("1").unwrap();
        assert_eq!((p.start_year, p.end_year), (1785, 1840));
        assert_eq!(TimePeriod::from_choice("2").unwrap().end_year, 1923);
        assert_eq!(TimePeriod::from_choice("3").unwrap().start_year, 1934);
        assert_eq!(TimePeriod::from_choice("4").unwrap().start_year, 1951);
        assert!(TimePeriod::from_choice("x").is_none());
    }
}
