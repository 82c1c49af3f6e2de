//! Chart rendering: turn [`Figure`] descriptors into **SVG** or **PNG** files.
//!
//! - Distinct series colors (Microsoft Office palette)
//! - Magnitude-scaled Y axis with locale-aware tick labels (`30,000` vs `30.000`)
//! - Legend placement: `Inside`, `Right`, `Top`, `Bottom`
//! - Figure kinds: multi-series line, pie, categorical bar

pub mod figures;
pub mod legend;
pub mod text;
pub mod types;
pub mod util;

pub use figures::{BarFigure, Figure, LineFigure, PieFigure, Series};
pub use types::{DEFAULT_LEGEND_MODE, LegendMode, RenderOptions};

use anyhow::{Result, anyhow, bail};
use num_format::Locale;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::prelude::*;
use plotters::series::LineSeries;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use legend::{draw_legend_panel, estimate_band_height_px};
use text::truncate_to_width;
use util::{
    choose_axis_scale, compute_left_label_area_px, format_tick, map_locale, office_color,
    office_rgb, scaled_axis_title,
};

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

const MARGIN: i32 = 16;
const Y_LABEL_COUNT: usize = 10;

/// Render `figure` to `out_path`; `.svg` selects the SVG backend, anything else PNG.
pub fn render<P: AsRef<Path>>(figure: &Figure, out_path: P, opts: &RenderOptions) -> Result<()> {
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (opts.width, opts.height);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_figure(root, figure, opts)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_figure(root, figure, opts)
    }
}

fn draw_figure<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    figure: &Figure,
    opts: &RenderOptions,
) -> Result<()> {
    let locale = map_locale(&opts.locale);
    match figure {
        Figure::Line(f) => draw_line(root, f, locale, opts.legend),
        Figure::Pie(f) => draw_pie(root, f),
        Figure::Bar(f) => draw_bar(root, f, locale),
    }
}

/// Split off the legend area, returning (plot, legend).
fn split_for_legend<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    legend: LegendMode,
    labels: &[String],
    axis_x_start_px: i32,
) -> (DrawingArea<DB, Shift>, Option<DrawingArea<DB, Shift>>) {
    let (w, h) = root.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    match legend {
        LegendMode::Inside => (root, None),
        LegendMode::Right => {
            let (plot, legend) = root.split_horizontally((85).percent_width());
            (plot, Some(legend))
        }
        LegendMode::Top => {
            let band = estimate_band_height_px(labels, axis_x_start_px, w).max(40);
            let (legend, plot) = root.split_vertically(band);
            (plot, Some(legend))
        }
        LegendMode::Bottom => {
            let band = estimate_band_height_px(labels, axis_x_start_px, w).max(40);
            // keep at least 40px for plot area
            let (plot, legend) = root.split_vertically((h - band).max(40));
            (plot, Some(legend))
        }
    }
}

fn draw_line<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    fig: &LineFigure,
    locale: &Locale,
    legend: LegendMode,
) -> Result<()> {
    let all: Vec<(i32, f64)> = fig
        .series
        .iter()
        .flat_map(|s| s.points.iter().copied())
        .collect();
    if all.is_empty() {
        bail!("no data to plot");
    }

    let (mut min_year, mut max_year) = all
        .iter()
        .fold((i32::MAX, i32::MIN), |(lo, hi), (y, _)| (lo.min(*y), hi.max(*y)));
    if min_year == max_year {
        min_year -= 1;
        max_year += 1;
    }
    // Emissions are non-negative; anchor the axis at zero.
    let min_val = all.iter().map(|(_, v)| *v).fold(0.0f64, f64::min);
    let mut max_val = all.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    if (max_val - min_val).abs() < f64::EPSILON {
        max_val = min_val + 1.0;
    }

    let (yscale, scale_word) = choose_axis_scale(min_val.abs().max(max_val.abs()));
    let y_title = scaled_axis_title(&fig.y_label, scale_word);
    let (ymin, ymax) = (min_val / yscale, max_val / yscale);

    let left_label_px = compute_left_label_area_px(ymin, ymax, Y_LABEL_COUNT, 12, locale);
    let axis_x_start_px = MARGIN + left_label_px as i32;
    let labels: Vec<String> = fig.series.iter().map(|s| s.label.clone()).collect();

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let (plot_area, legend_area) = split_for_legend(root, legend, &labels, axis_x_start_px);

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(MARGIN as u32)
        .caption(fig.title.as_str(), (FontFamily::SansSerif, 22))
        .set_label_area_size(LabelAreaPosition::Left, left_label_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(min_year as f64..max_year as f64, ymin..ymax)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_label_fmt = |x: &f64| (x.round() as i32).to_string();
    let y_label_fmt = |v: &f64| format_tick(*v, locale);
    chart
        .configure_mesh()
        .x_desc(fig.x_label.as_str())
        .y_desc(y_title)
        .x_labels(((max_year - min_year + 1) as usize).min(12))
        .y_labels(Y_LABEL_COUNT)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let mut legend_items: Vec<(String, RGBAColor)> = Vec::new();
    for (idx, s) in fig.series.iter().enumerate() {
        let color = office_color(idx);
        let style = ShapeStyle {
            color,
            filled: false,
            stroke_width: 2,
        };
        let scaled: Vec<(f64, f64)> = s
            .points
            .iter()
            .map(|(x, y)| (*x as f64, *y / yscale))
            .collect();
        let elem = chart
            .draw_series(LineSeries::new(scaled, style))
            .map_err(|e| anyhow!("{:?}", e))?;
        if legend_area.is_none() {
            elem.label(s.label.clone())
                .legend(move |(x, y)| Circle::new((x + 8, y), 4, color.filled()));
        } else {
            legend_items.push((s.label.clone(), color));
        }
    }

    match legend_area {
        None => {
            chart
                .configure_series_labels()
                .border_style(BLACK)
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.85))
                .label_font((FontFamily::SansSerif, 14))
                .draw()
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        Some(ref area) => draw_legend_panel(area, &legend_items, legend, axis_x_start_px)?,
    }

    plot_area.present().map_err(|e| anyhow!("{:?}", e))?;
    if let Some(ref area) = legend_area {
        area.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

fn draw_pie<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, fig: &PieFigure) -> Result<()> {
    let sizes: Vec<f64> = fig.slices.iter().map(|(_, v)| v.max(0.0)).collect();
    if sizes.is_empty() || sizes.iter().sum::<f64>() <= 0.0 {
        bail!("no data to plot");
    }
    let colors: Vec<RGBColor> = (0..sizes.len()).map(office_rgb).collect();
    let labels: Vec<String> = fig
        .slices
        .iter()
        .map(|(label, _)| truncate_to_width(label, 14, 180))
        .collect();

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let area = root
        .titled(fig.title.as_str(), (FontFamily::SansSerif, 22))
        .map_err(|e| anyhow!("{:?}", e))?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = (w.min(h) as f64) * 0.36;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style((FontFamily::SansSerif, 14));
    pie.label_offset(8.0);
    // Slice shares as "{:.1}%" at half the radius.
    pie.percentages((FontFamily::SansSerif, 12));
    area.draw(&pie).map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_bar<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    fig: &BarFigure,
    locale: &Locale,
) -> Result<()> {
    if fig.bars.is_empty() {
        bail!("no data to plot");
    }
    let n = fig.bars.len() as i32;
    let min_val = fig.bars.iter().map(|(_, v)| *v).fold(0.0f64, f64::min);
    let mut max_val = fig.bars.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    if (max_val - min_val).abs() < f64::EPSILON {
        max_val = min_val + 1.0;
    }
    let (yscale, scale_word) = choose_axis_scale(min_val.abs().max(max_val.abs()));
    let (ymin, ymax) = (min_val / yscale, max_val / yscale);
    let left_label_px = compute_left_label_area_px(ymin, ymax, Y_LABEL_COUNT, 12, locale);

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN as u32)
        .caption(fig.title.as_str(), (FontFamily::SansSerif, 22))
        .set_label_area_size(LabelAreaPosition::Left, left_label_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d((0..n).into_segmented(), ymin..ymax)
        .map_err(|e| anyhow!("{:?}", e))?;

    // Category names shrink with the number of bars so neighbours don't collide.
    let slot_px = ((root.dim_in_pixel().0 as i32 - left_label_px as i32) / n.max(1)).max(24) as u32;
    let x_label_fmt = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => fig
            .bars
            .get(*i as usize)
            .map(|(name, _)| truncate_to_width(name, 12, slot_px))
            .unwrap_or_default(),
        _ => String::new(),
    };
    let y_label_fmt = |v: &f64| format_tick(*v, locale);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(fig.x_label.as_str())
        .y_desc(scaled_axis_title(&fig.y_label, scale_word))
        .x_labels(fig.bars.len())
        .y_labels(Y_LABEL_COUNT)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .draw_series(fig.bars.iter().enumerate().map(|(i, (_, v))| {
            let i = i as i32;
            let (y0, y1) = (0.0f64.min(*v) / yscale, 0.0f64.max(*v) / yscale);
            let mut rect = Rectangle::new(
                [(SegmentValue::Exact(i), y0), (SegmentValue::Exact(i + 1), y1)],
                office_color(0).filled(),
            );
            rect.set_margin(0, 0, 6, 6);
            rect
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
