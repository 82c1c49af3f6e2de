//! Interactive period-growth menu.
//!
//! Input comes from a [`ChoiceProvider`] so the flow can be driven by stdin, a
//! scripted list (`--periods 1,3`), or a test.

use crate::analysis::growth;
use crate::error::Result;
use crate::models::{Growth, Table, TimePeriod};
use serde::Serialize;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Inputs the menu accepts; anything else is re-prompted.
pub const MENU_CHOICES: [&str; 5] = ["1", "2", "3", "4", "x"];

/// Source of menu selections.
pub trait ChoiceProvider {
    /// Next raw line of input, or `None` once input is exhausted.
    fn next_choice(&mut self) -> Option<String>;
}

/// Reads one choice per line from a buffered reader (stdin in the CLI).
pub struct ReaderChoices<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ReaderChoices<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> ChoiceProvider for ReaderChoices<R> {
    fn next_choice(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(e) => {
                log::warn!("failed to read menu input: {e}");
                None
            }
        }
    }
}

/// Pre-recorded choices, consumed front to back.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChoices {
    queue: VecDeque<String>,
}

impl ScriptedChoices {
    /// Parse a comma/semicolon separated list such as `"1,3,x"`.
    pub fn parse(s: &str) -> Self {
        s.split([',', ';'])
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .map(String::from)
            .collect()
    }
}

impl FromIterator<String> for ScriptedChoices {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}

impl ChoiceProvider for ScriptedChoices {
    fn next_choice(&mut self) -> Option<String> {
        self.queue.pop_front()
    }
}

/// Growth of a country selection over one chosen period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodGrowth {
    pub period: TimePeriod,
    pub growth: Vec<Growth>,
}

fn print_menu<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "\n[Time Period Growth Menu]\n")?;
    writeln!(out, "[1]: American Industrialization")?;
    writeln!(out, "[2]: WWI")?;
    writeln!(out, "[3]: WWII")?;
    writeln!(out, "[4]: Modern era (end of WWII-2017)")?;
    writeln!(out, "[x]: EXIT")?;
    write!(out, "Please choose an option: ")?;
    out.flush()
}

/// Run the menu until `x` or end of input, returning one result per valid period choice.
///
/// Invalid input is answered with a hint and the menu is shown again. Data errors
/// (a missing country or year column) abort the loop.
pub fn run_growth_menu<S, P, W>(
    table: &Table,
    countries: &[S],
    provider: &mut P,
    out: &mut W,
) -> Result<Vec<PeriodGrowth>>
where
    S: AsRef<str>,
    P: ChoiceProvider + ?Sized,
    W: Write,
{
    let mut results = Vec::new();
    loop {
        print_menu(out)?;
        let Some(raw) = provider.next_choice() else {
            writeln!(out)?;
            break;
        };
        let choice = raw.trim();
        if !MENU_CHOICES.contains(&choice) {
            writeln!(out, "Please enter a valid choice..")?;
            continue;
        }
        let Some(period) = TimePeriod::from_choice(choice) else {
            break;
        };

        let grown = growth(table, countries, &period)?;
        writeln!(
            out,
            "\nEmissions (tons) created during {} - {}",
            period.start_year, period.end_year
        )?;
        for g in &grown {
            writeln!(out, "{} {}", g.country, g.delta)?;
        }
        results.push(PeriodGrowth {
            period,
            growth: grown,
        });
    }
    Ok(results)
}
