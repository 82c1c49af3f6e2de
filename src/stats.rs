use crate::models::Table;
use serde::{Deserialize, Serialize};

/// Shape of the loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub rows: usize,
    pub columns: usize,
    /// `rows * columns`, the number of cells in the file body.
    pub cells: usize,
}

pub fn overview(table: &Table) -> Overview {
    let rows = table.len();
    let columns = table.column_count();
    Overview {
        rows,
        columns,
        cells: rows * columns,
    }
}

/// Descriptive statistics for one year column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub year: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); `None` below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Per-year summaries across all rows, in column order.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    table
        .years()
        .iter()
        .enumerate()
        .map(|(col, year)| {
            let mut vals: Vec<f64> = table.rows().iter().map(|r| r.values[col]).collect();
            vals.sort_by(|a, b| a.total_cmp(b));
            summarize(year, &vals)
        })
        .collect()
}

fn summarize(year: &str, sorted: &[f64]) -> ColumnSummary {
    let count = sorted.len();
    let mean = if count > 0 {
        Some(sorted.iter().sum::<f64>() / count as f64)
    } else {
        None
    };
    let std = match mean {
        Some(m) if count > 1 => {
            let ss: f64 = sorted.iter().map(|v| (v - m).powi(2)).sum();
            Some((ss / (count - 1) as f64).sqrt())
        }
        _ => None,
    };
    ColumnSummary {
        year: year.to_string(),
        count,
        mean,
        std,
        min: sorted.first().copied(),
        q25: quantile(sorted, 0.25),
        median: quantile(sorted, 0.5),
        q75: quantile(sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Linear-interpolated quantile of an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantiles_interpolate_between_neighbours() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&v, 0.5), Some(2.5));
        assert_eq!(quantile(&v, 0.25), Some(1.75));
        assert_eq!(quantile(&v, 0.75), Some(3.25));
        assert_eq!(quantile(&[], 0.5), None);
    }
}
