use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;

use emissions_rs::menu::{ChoiceProvider, PeriodGrowth, ReaderChoices, ScriptedChoices};
use emissions_rs::models::{DEFAULT_HEAD_ROWS, DEFAULT_REFERENCE_YEAR, DEFAULT_SELECTION};
use emissions_rs::report::{Analysis, Report};
use emissions_rs::viz::{self, Figure, LegendMode, RenderOptions};
use emissions_rs::{
    CountryTotal, Direction, FilterMode, Table, analysis, filter, menu, stats, storage,
};

#[derive(Parser, Debug)]
#[command(
    name = "emis",
    version,
    about = "Rank, summarize & chart per-country greenhouse-gas emissions"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Emissions CSV: a Country column followed by one column per year.
    #[arg(long, global = true, default_value = "emission data.csv")]
    data: PathBuf,
    /// Write charts into this directory. Without it, charts are built but not written.
    #[arg(long, global = true)]
    charts: Option<PathBuf>,
    /// Chart file format.
    #[arg(long, global = true, value_enum, default_value_t = ChartFormat::Svg)]
    chart_format: ChartFormat,
    /// Chart width in pixels.
    #[arg(long, global = true, default_value_t = 1000)]
    width: u32,
    /// Chart height in pixels.
    #[arg(long, global = true, default_value_t = 600)]
    height: u32,
    /// Locale for chart tick labels (e.g. en, de, fr).
    #[arg(long, global = true, default_value = "en")]
    locale: String,
    /// Legend placement for line charts.
    #[arg(long, global = true, value_enum, default_value_t = LegendArg::Bottom)]
    legend: LegendArg,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print row/column counts, per-year statistics and the first rows.
    Info {
        /// Number of rows to show.
        #[arg(long, default_value_t = DEFAULT_HEAD_ROWS)]
        head: usize,
    },
    /// Rank countries by total emissions over all years.
    Rank(RankArgs),
    /// First year each country emitted more than zero tons.
    Onset {
        #[command(flatten)]
        view: ViewArgs,
        /// Save results (.csv or .json).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Share of the World total held by the top countries.
    Share {
        /// Number of countries.
        #[arg(short, default_value_t = DEFAULT_SELECTION)]
        n: usize,
        /// Year whose World value is the denominator.
        #[arg(long, default_value = DEFAULT_REFERENCE_YEAR)]
        reference_year: String,
        /// Save results (.csv or .json).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Net emission growth of the top (or bottom) countries over historical periods.
    Growth {
        /// Use the bottom countries instead of the top ones.
        #[arg(long, default_value_t = false)]
        bottom: bool,
        /// Number of countries.
        #[arg(short, default_value_t = DEFAULT_SELECTION)]
        n: usize,
        /// Menu choices to run without prompting, e.g. "1,3,x".
        #[arg(long)]
        periods: Option<String>,
        /// Save results (.csv or .json).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the whole analysis: info, rankings, charts, shares, onsets, growth.
    Report {
        /// Number of countries in each selection.
        #[arg(short, default_value_t = DEFAULT_SELECTION)]
        n: usize,
        /// Year whose World value normalizes the share view.
        #[arg(long, default_value = DEFAULT_REFERENCE_YEAR)]
        reference_year: String,
        /// Menu choices for both growth menus, e.g. "4,x". Prompts when omitted.
        #[arg(long)]
        periods: Option<String>,
        /// Save the report as JSON.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RankArgs {
    /// Rank ascending (smallest emitters first).
    #[arg(long, default_value_t = false)]
    bottom: bool,
    /// Number of rows to return.
    #[arg(short, default_value_t = DEFAULT_SELECTION)]
    n: usize,
    #[command(flatten)]
    view: ViewArgs,
    /// Save results (.csv or .json).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Rows to consider.
    #[arg(long, value_enum, default_value_t = FilterArg::Countries)]
    filter: FilterArg,
    /// Numeric filter id (0 all, 1 countries, 2 regions); overrides --filter. Unknown ids mean all.
    #[arg(long)]
    filter_id: Option<i64>,
}

impl ViewArgs {
    fn apply(&self, table: &Table) -> Result<Table> {
        let view = match self.filter_id {
            Some(id) => filter::filter_by_id(table, id)?,
            None => filter::filter(table, self.filter.into())?,
        };
        Ok(view)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FilterArg {
    All,
    Countries,
    Regions,
}

impl From<FilterArg> for FilterMode {
    fn from(f: FilterArg) -> Self {
        match f {
            FilterArg::All => FilterMode::All,
            FilterArg::Countries => FilterMode::CountriesOnly,
            FilterArg::Regions => FilterMode::RegionsOnly,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChartFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LegendArg {
    Inside,
    Right,
    Top,
    Bottom,
}

impl From<LegendArg> for LegendMode {
    fn from(l: LegendArg) -> Self {
        match l {
            LegendArg::Inside => LegendMode::Inside,
            LegendArg::Right => LegendMode::Right,
            LegendArg::Top => LegendMode::Top,
            LegendArg::Bottom => LegendMode::Bottom,
        }
    }
}

impl CommonArgs {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            height: self.height,
            locale: self.locale.clone(),
            legend: self.legend.into(),
        }
    }

    /// Render figures into `--charts`, file names prefixed with `prefix`.
    fn write_figures(&self, figures: &[Figure], prefix: &str) -> Result<()> {
        let Some(dir) = self.charts.as_ref() else {
            log::info!(
                "built {} figure(s); pass --charts <DIR> to write them",
                figures.len()
            );
            return Ok(());
        };
        std::fs::create_dir_all(dir)?;
        let ext = match self.chart_format {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
        };
        let opts = self.render_options();
        let mut written = HashSet::new();
        for fig in figures {
            if fig.is_empty() {
                log::warn!("skipping '{}': nothing to draw", fig.title());
                continue;
            }
            let path = dir.join(format!("{prefix}{}.{ext}", fig.file_stem()));
            // A repeated period yields the same figure and file name.
            if !written.insert(path.clone()) {
                log::debug!("'{}' already written", fig.title());
                continue;
            }
            viz::render(fig, &path, &opts)?;
            eprintln!("Wrote chart to {}", path.display());
        }
        Ok(())
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let table = storage::load_table(&cli.common.data)?;
    match cli.cmd {
        Command::Info { head } => cmd_info(&table, head),
        Command::Rank(args) => cmd_rank(&cli.common, &table, args),
        Command::Onset { view, out } => cmd_onset(&table, &view, out),
        Command::Share {
            n,
            reference_year,
            out,
        } => cmd_share(&cli.common, &table, n, &reference_year, out),
        Command::Growth {
            bottom,
            n,
            periods,
            out,
        } => cmd_growth(&cli.common, &table, bottom, n, periods.as_deref(), out),
        Command::Report {
            n,
            reference_year,
            periods,
            out,
        } => cmd_report(&cli.common, &table, n, &reference_year, periods.as_deref(), out),
    }
}

/// Key plus the first and last three year values.
fn row_preview(key: &str, values: &[String]) -> String {
    if values.len() <= 6 {
        return format!("{key} {}", values.join(" "));
    }
    format!(
        "{key} {} ... {}",
        values[..3].join(" "),
        values[values.len() - 3..].join(" ")
    )
}

fn cmd_info(table: &Table, head: usize) -> Result<()> {
    let o = stats::overview(table);
    println!("Rows: {} Columns: {}", o.rows, o.columns);
    println!("Total Number of Data: {}", o.cells);
    println!("Describe Dataset:");
    println!("year count mean std min 25% 50% 75% max");
    for s in stats::describe(table) {
        println!(
            "{} {} {} {} {} {} {} {} {}",
            s.year,
            s.count,
            fmt_opt(s.mean),
            fmt_opt(s.std),
            fmt_opt(s.min),
            fmt_opt(s.q25),
            fmt_opt(s.median),
            fmt_opt(s.q75),
            fmt_opt(s.max)
        );
    }
    println!("{}", row_preview(table.key_column(), table.years()));
    for row in table.head(head) {
        let values: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
        println!("{}", row_preview(&row.key, &values));
    }
    Ok(())
}

fn print_totals(totals: &[CountryTotal]) {
    for c in totals {
        println!("{} {}", c.country, c.total);
    }
}

fn cmd_rank(common: &CommonArgs, table: &Table, args: RankArgs) -> Result<()> {
    let view = args.view.apply(table)?;
    let direction = if args.bottom {
        Direction::Bottom
    } else {
        Direction::Top
    };
    let ranked = analysis::rank(&analysis::aggregate(&view), direction, args.n)?;
    print_totals(&ranked);

    if let Some(path) = args.out.as_ref() {
        storage::save_records(&ranked, path)?;
        eprintln!("Saved {} rows to {}", ranked.len(), path.display());
    }
    if view.view() == FilterMode::CountriesOnly {
        let fig = viz::figures::emissions_over_time(table, &ranked, direction)?;
        common.write_figures(&[Figure::Line(fig)], "")?;
    } else {
        log::info!("over-time chart is drawn for the country view only");
    }
    Ok(())
}

fn cmd_onset(table: &Table, view: &ViewArgs, out: Option<PathBuf>) -> Result<()> {
    let onsets = analysis::first_positive_year(&view.apply(table)?);
    for o in &onsets {
        println!("{} had emissions over 0 tons starting in: {}", o.country, o.year);
    }
    if let Some(path) = out.as_ref() {
        storage::save_records(&onsets, path)?;
        eprintln!("Saved {} rows to {}", onsets.len(), path.display());
    }
    Ok(())
}

fn cmd_share(
    common: &CommonArgs,
    table: &Table,
    n: usize,
    reference_year: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    let countries = filter::filter(table, FilterMode::CountriesOnly)?;
    let top = analysis::rank(&analysis::aggregate(&countries), Direction::Top, n)?;
    let shares = analysis::world_share(table, &top, reference_year)?;
    for s in &shares {
        println!("{} {}", s.country, s.fraction);
    }
    if let Some(path) = out.as_ref() {
        storage::save_records(&shares, path)?;
        eprintln!("Saved {} rows to {}", shares.len(), path.display());
    }
    let pie = viz::figures::world_share_pie(&shares);
    common.write_figures(&[Figure::Pie(pie)], "")
}

/// Run one growth menu, reading from `--periods` when given and stdin otherwise.
fn growth_menu(
    table: &Table,
    countries: &[String],
    periods: Option<&str>,
) -> Result<Vec<PeriodGrowth>> {
    let mut provider: Box<dyn ChoiceProvider> = match periods {
        Some(script) => Box::new(ScriptedChoices::parse(script)),
        None => Box::new(ReaderChoices::new(io::stdin().lock())),
    };
    let mut out = io::stdout().lock();
    let results = menu::run_growth_menu(table, countries, provider.as_mut(), &mut out)?;
    out.flush()?;
    Ok(results)
}

fn cmd_growth(
    common: &CommonArgs,
    table: &Table,
    bottom: bool,
    n: usize,
    periods: Option<&str>,
    out: Option<PathBuf>,
) -> Result<()> {
    let countries = filter::filter(table, FilterMode::CountriesOnly)?;
    let direction = if bottom {
        Direction::Bottom
    } else {
        Direction::Top
    };
    let keys: Vec<String> = analysis::rank(&analysis::aggregate(&countries), direction, n)?
        .into_iter()
        .map(|c| c.country)
        .collect();
    let results = growth_menu(table, &keys, periods)?;

    if let Some(path) = out.as_ref() {
        storage::save_period_growth(&results, path)?;
        eprintln!("Saved {} period(s) to {}", results.len(), path.display());
    }
    let figures: Vec<Figure> = results
        .iter()
        .map(|r| Figure::Bar(viz::figures::growth_bar(r)))
        .collect();
    common.write_figures(&figures, if bottom { "bottom_" } else { "top_" })
}

fn cmd_report(
    common: &CommonArgs,
    table: &Table,
    n: usize,
    reference_year: &str,
    periods: Option<&str>,
    out: Option<PathBuf>,
) -> Result<()> {
    println!("Emission Dataset Info:");
    cmd_info(table, DEFAULT_HEAD_ROWS)?;

    let analysis = Analysis::run(table, n, reference_year)?;
    println!("\nTop {n} countries by emissions:");
    print_totals(&analysis.top);
    println!("\nBottom {n} countries by emissions:");
    print_totals(&analysis.bottom);

    println!("\nPercent of world emissions made up by the top {n} countries:");
    for s in &analysis.shares {
        println!("{} {}", s.country, s.fraction);
    }
    common.write_figures(&analysis.figures(table)?, "")?;

    for o in &analysis.onset {
        println!("{} had emissions over 0 tons starting in: {}", o.country, o.year);
    }

    println!("\nGrowth of top countries in different time periods:");
    let top_growth = growth_menu(table, &analysis.top_keys(), periods)?;
    println!("\nGrowth of bottom countries in different time periods:");
    let bottom_growth = growth_menu(table, &analysis.bottom_keys(), periods)?;

    let report = Report::new(
        common.data.display().to_string(),
        table,
        analysis,
        top_growth,
        bottom_growth,
    );
    let growth_figures = report.growth_figures();
    let (top_figures, bottom_figures) = growth_figures.split_at(report.top_growth.len());
    common.write_figures(top_figures, "top_")?;
    common.write_figures(bottom_figures, "bottom_")?;

    if let Some(path) = out.as_ref() {
        storage::save_json(&report, path)?;
        eprintln!("Saved report to {}", path.display());
    }
    Ok(())
}
