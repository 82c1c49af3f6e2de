//! emissions_rs
//!
//! A small Rust library for exploring per-country greenhouse-gas emissions over
//! time. Pairs with the `emis` CLI.
//!
//! ### Features
//! - Load the year-per-column emissions CSV into an indexed [`Table`]
//! - Country-only and region-only views of the dataset
//! - Total emissions per country, top/bottom rankings, first year above zero
//! - Net growth over named historical periods, shares of the World total
//! - Line, pie, and bar charts rendered to SVG/PNG
//!
//! ### Example
//! ```no_run
//! use emissions_rs::{Direction, FilterMode, analysis, filter, storage};
//!
//! let table = storage::load_table("emission data.csv")?;
//! let countries = filter::filter(&table, FilterMode::CountriesOnly)?;
//! let totals = analysis::aggregate(&countries);
//! for c in analysis::rank(&totals, Direction::Top, 10)? {
//!     println!("{} {}", c.country, c.total);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod analysis;
pub mod error;
pub mod filter;
pub mod menu;
pub mod models;
pub mod report;
pub mod stats;
pub mod storage;
pub mod viz;

pub use error::EmissionsError;
pub use models::{
    CountryTotal, Direction, FilterMode, Growth, Onset, Row, Share, Table, TimePeriod,
};
