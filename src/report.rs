//! The complete analysis run: selections, shares, onsets, and growth, bundled for
//! console output, charting, and JSON export.

use crate::analysis::{aggregate, first_positive_year, rank, world_share};
use crate::error::Result;
use crate::filter::filter;
use crate::menu::PeriodGrowth;
use crate::models::{CountryTotal, Direction, FilterMode, Onset, Share, Table};
use crate::stats::{Overview, overview};
use crate::viz::figures::{Figure, emissions_over_time, growth_bar, world_share_pie};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Selections derived from one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub top: Vec<CountryTotal>,
    pub bottom: Vec<CountryTotal>,
    pub reference_year: String,
    /// Shares of the top selection in World's reference-year value.
    pub shares: Vec<Share>,
    pub onset: Vec<Onset>,
}

impl Analysis {
    /// Rank over the country-only view; shares are normalized against the raw table's World row.
    pub fn run(table: &Table, n: usize, reference_year: &str) -> Result<Self> {
        let countries = filter(table, FilterMode::CountriesOnly)?;
        let totals = aggregate(&countries);
        let top = rank(&totals, Direction::Top, n)?;
        let bottom = rank(&totals, Direction::Bottom, n)?;
        let shares = world_share(table, &top, reference_year)?;
        let onset = first_positive_year(&countries);
        Ok(Self {
            top,
            bottom,
            reference_year: reference_year.to_string(),
            shares,
            onset,
        })
    }

    /// Figures 1 to 3: top and bottom over time, then the world-share pie.
    pub fn figures(&self, table: &Table) -> Result<Vec<Figure>> {
        Ok(vec![
            Figure::Line(emissions_over_time(table, &self.top, Direction::Top)?),
            Figure::Line(emissions_over_time(table, &self.bottom, Direction::Bottom)?),
            Figure::Pie(world_share_pie(&self.shares)),
        ])
    }

    pub fn top_keys(&self) -> Vec<String> {
        self.top.iter().map(|c| c.country.clone()).collect()
    }

    pub fn bottom_keys(&self) -> Vec<String> {
        self.bottom.iter().map(|c| c.country.clone()).collect()
    }
}

/// Everything a full run produced, as written by `emis report --out`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub overview: Overview,
    #[serde(flatten)]
    pub analysis: Analysis,
    pub top_growth: Vec<PeriodGrowth>,
    pub bottom_growth: Vec<PeriodGrowth>,
}

impl Report {
    pub fn new(
        source: impl Into<String>,
        table: &Table,
        analysis: Analysis,
        top_growth: Vec<PeriodGrowth>,
        bottom_growth: Vec<PeriodGrowth>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            source: source.into(),
            overview: overview(table),
            analysis,
            top_growth,
            bottom_growth,
        }
    }

    /// Figure 4 once per growth result, top selection first.
    pub fn growth_figures(&self) -> Vec<Figure> {
        self.top_growth
            .iter()
            .chain(&self.bottom_growth)
            .map(|g| Figure::Bar(growth_bar(g)))
            .collect()
    }
}
