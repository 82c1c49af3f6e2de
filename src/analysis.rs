//! Aggregation, ranking, onset detection and period growth over a [`Table`].
//!
//! Every function is pure: it reads the table and returns a fresh value.
//! Result vectors follow the table's row order unless stated otherwise.

use crate::error::{EmissionsError, Result};
use crate::models::{
    CountryTotal, Direction, Growth, Onset, Share, Table, TimePeriod, WORLD_KEY,
};

/// Sum every year column per row, skipping the World pseudo-country.
pub fn aggregate(table: &Table) -> Vec<CountryTotal> {
    table
        .rows()
        .iter()
        .filter(|r| r.key != WORLD_KEY)
        .map(|r| CountryTotal {
            country: r.key.clone(),
            total: r.values.iter().sum(),
        })
        .collect()
}

/// First `n` totals after a stable sort in `direction`.
///
/// Equal totals keep their input order, so zero-emission rows rank deterministically.
pub fn rank(totals: &[CountryTotal], direction: Direction, n: usize) -> Result<Vec<CountryTotal>> {
    if totals.len() < n {
        return Err(EmissionsError::InsufficientData {
            needed: n,
            found: totals.len(),
        });
    }
    let mut sorted = totals.to_vec();
    match direction {
        Direction::Top => sorted.sort_by(|a, b| b.total.total_cmp(&a.total)),
        Direction::Bottom => sorted.sort_by(|a, b| a.total.total_cmp(&b.total)),
    }
    sorted.truncate(n);
    log::debug!("rank {direction:?}: kept {n} of {}", totals.len());
    Ok(sorted)
}

/// Label of the first year column with a value above zero, per country.
///
/// Columns are scanned in the table's own order. Countries that never exceed
/// zero get no entry.
pub fn first_positive_year(table: &Table) -> Vec<Onset> {
    let years = table.years();
    table
        .rows()
        .iter()
        .filter(|r| r.key != WORLD_KEY)
        .filter_map(|r| {
            r.values.iter().position(|v| *v > 0.0).map(|i| Onset {
                country: r.key.clone(),
                year: years[i].clone(),
            })
        })
        .collect()
}

/// `end - start` for every listed country, including flat and declining ones.
pub fn period_deltas<S: AsRef<str>>(
    table: &Table,
    countries: &[S],
    period: &TimePeriod,
) -> Result<Vec<Growth>> {
    let start = period.start_label();
    let end = period.end_label();
    let start_col = table
        .year_index(&start)
        .ok_or(EmissionsError::MissingColumn(start))?;
    let end_col = table
        .year_index(&end)
        .ok_or(EmissionsError::MissingColumn(end))?;

    let subset = table.select(countries)?;
    Ok(subset
        .rows()
        .iter()
        .map(|r| Growth {
            country: r.key.clone(),
            delta: r.values[end_col] - r.values[start_col],
        })
        .collect())
}

/// Net growth per country over `period`, keeping only strictly positive deltas.
///
/// Flat or declining countries are dropped; use [`period_deltas`] for the full picture.
pub fn growth<S: AsRef<str>>(
    table: &Table,
    countries: &[S],
    period: &TimePeriod,
) -> Result<Vec<Growth>> {
    let deltas = period_deltas(table, countries, period)?;
    let total = deltas.len();
    let kept: Vec<Growth> = deltas.into_iter().filter(|g| g.delta > 0.0).collect();
    log::debug!(
        "growth {}: {} of {total} countries grew",
        period.label,
        kept.len()
    );
    Ok(kept)
}

/// Each selected total as a fraction of World's value in `reference_year`, rounded to 3 places.
pub fn world_share(
    table: &Table,
    selection: &[CountryTotal],
    reference_year: &str,
) -> Result<Vec<Share>> {
    let world = table.value(WORLD_KEY, reference_year)?;
    if world == 0.0 {
        return Err(EmissionsError::DataAccess(format!(
            "{WORLD_KEY} value for {reference_year} is zero"
        )));
    }
    Ok(selection
        .iter()
        .map(|c| Share {
            country: c.country.clone(),
            fraction: round_to(c.total / world, 3),
        })
        .collect())
}

fn round_to(v: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (v * f).round() / f
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(vals: &[(&str, f64)]) -> Vec<CountryTotal> {
        vals.iter()
            .map(|(c, t)| CountryTotal {
                country: c.to_string(),
                total: *t,
            })
            .collect()
    }

    #[test]
    fn bottom_rank_keeps_zero_ties_in_input_order() {
        let t = totals(&[("A", 0.0), ("B", 5.0), ("C", 0.0), ("D", 0.0)]);
        let got = rank(&t, Direction::Bottom, 3).unwrap();
        let keys: Vec<&str> = got.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(keys, vec!["A", "C", "D"]);
    }

    #[test]
    fn rounding_to_three_places() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(0.9996, 3), 1.0);
    }
}
