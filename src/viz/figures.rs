//! Figure descriptors: plain data that the renderer turns into charts.
//!
//! Building a figure never touches a drawing surface, so the selection logic behind
//! each chart can be tested without rendering anything.

use crate::error::{EmissionsError, Result};
use crate::filter::filter;
use crate::menu::PeriodGrowth;
use crate::models::{CountryTotal, Direction, FilterMode, Share, Table};
use serde::Serialize;

pub const YEARS_AXIS: &str = "Years";
pub const EMISSIONS_AXIS: &str = "Emissions (tons)";
pub const COUNTRY_AXIS: &str = "Country";

/// One labelled time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<(i32, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFigure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieFigure {
    pub title: String,
    pub slices: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarFigure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Figure {
    Line(LineFigure),
    Pie(PieFigure),
    Bar(BarFigure),
}

impl Figure {
    pub fn title(&self) -> &str {
        match self {
            Figure::Line(f) => &f.title,
            Figure::Pie(f) => &f.title,
            Figure::Bar(f) => &f.title,
        }
    }

    /// True when there is nothing to draw (e.g. no country grew during a period).
    pub fn is_empty(&self) -> bool {
        match self {
            Figure::Line(f) => f.series.iter().all(|s| s.points.is_empty()),
            Figure::Pie(f) => f.slices.is_empty(),
            Figure::Bar(f) => f.bars.is_empty(),
        }
    }

    /// File-name friendly stem of the title ("Fig 1: Emissions ..." -> "fig_1_emissions_...").
    pub fn file_stem(&self) -> String {
        let mut out = String::new();
        for ch in self.title().chars() {
            if ch.is_ascii_alphanumeric() {
                out.push(ch.to_ascii_lowercase());
            } else if !out.ends_with('_') {
                out.push('_');
            }
        }
        out.trim_matches('_').to_string()
    }
}

/// Line chart of every year column for the selected countries, read from the
/// country-only view of `table`.
pub fn emissions_over_time(
    table: &Table,
    selection: &[CountryTotal],
    direction: Direction,
) -> Result<LineFigure> {
    let countries = filter(table, FilterMode::CountriesOnly)?;
    let years = countries
        .years()
        .iter()
        .map(|y| {
            y.parse::<i32>()
                .map_err(|_| EmissionsError::DataAccess(format!("year label '{y}' is not numeric")))
        })
        .collect::<Result<Vec<i32>>>()?;

    let mut series = Vec::with_capacity(selection.len());
    for c in selection {
        let row = countries
            .row(&c.country)
            .ok_or_else(|| EmissionsError::MissingKey(c.country.clone()))?;
        series.push(Series {
            label: c.country.clone(),
            points: years.iter().copied().zip(row.values.iter().copied()).collect(),
        });
    }

    let title = match direction {
        Direction::Top => "Fig 1: Emissions of Top Countries Over Time",
        Direction::Bottom => "Fig 2: Emissions of Bottom Countries Over Time",
    };
    Ok(LineFigure {
        title: title.into(),
        x_label: YEARS_AXIS.into(),
        y_label: EMISSIONS_AXIS.into(),
        series,
    })
}

/// Pie of pre-normalized world shares.
pub fn world_share_pie(shares: &[Share]) -> PieFigure {
    PieFigure {
        title: "Fig 3: Percentage of World's Emissions (tons)".into(),
        slices: shares
            .iter()
            .map(|s| (s.country.clone(), s.fraction))
            .collect(),
    }
}

/// Bar chart of the positive growth for one period.
pub fn growth_bar(result: &PeriodGrowth) -> BarFigure {
    BarFigure {
        title: format!("Fig 4: Growth During {}", result.period.label),
        x_label: COUNTRY_AXIS.into(),
        y_label: EMISSIONS_AXIS.into(),
        bars: result
            .growth
            .iter()
            .map(|g| (g.country.clone(), g.delta))
            .collect(),
    }
}
