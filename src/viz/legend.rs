//! Legend layout and drawing for external legend placement.
//!
//! Top/Bottom bands flow items left to right starting at the plot's X-axis, wrapping
//! into further rows. The Right panel is a single column with wrapped labels.

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{estimate_text_width_px, truncate_to_width, wrap_text_to_width};
use super::types::LegendMode;

// Layout constants shared by the estimator and the painter.
const FONT_PX: u32 = 14;
const LINE_H: i32 = FONT_PX as i32 + 2;
const ROW_GAP: i32 = 4;
const PAD: i32 = 8;
const MARKER_RADIUS: i32 = 4;
const MARKER_TO_TEXT: i32 = 12;
const TRAILING_GAP: i32 = 16;

/// Widest label (in px) an item in a Top/Bottom band may take before truncation.
fn band_item_cap(start_x: i32, total_w: i32) -> u32 {
    (((total_w - start_x - PAD) as f32) * 0.45).max(120.0) as u32
}

fn band_item_width(label: &str, cap: u32) -> (String, i32) {
    let text = truncate_to_width(label, FONT_PX, cap);
    let w = MARKER_TO_TEXT + MARKER_RADIUS + estimate_text_width_px(&text, FONT_PX) as i32;
    (text, w + TRAILING_GAP)
}

/// Greedy row packing shared by [`estimate_band_height_px`] and [`draw_legend_panel`].
fn pack_rows(labels: &[String], start_x: i32, total_w: i32) -> Vec<Vec<(usize, String, i32)>> {
    let cap = band_item_cap(start_x, total_w);
    let right_edge = total_w - PAD;
    let mut rows: Vec<Vec<(usize, String, i32)>> = Vec::new();
    let mut cur: Vec<(usize, String, i32)> = Vec::new();
    let mut x = start_x;
    for (i, label) in labels.iter().enumerate() {
        let (text, w) = band_item_width(label, cap);
        if x + w > right_edge && !cur.is_empty() {
            rows.push(std::mem::take(&mut cur));
            x = start_x;
        }
        cur.push((i, text, x));
        x += w;
    }
    if !cur.is_empty() {
        rows.push(cur);
    }
    rows
}

/// Height in pixels a Top/Bottom legend band needs for `labels`.
pub fn estimate_band_height_px(labels: &[String], start_x: i32, total_w: i32) -> i32 {
    let rows = pack_rows(labels, start_x, total_w).len().max(1) as i32;
    PAD * 2 + rows * LINE_H + (rows - 1) * ROW_GAP
}

/// Draw the legend into its own drawing area.
pub fn draw_legend_panel<DB: DrawingBackend>(
    legend_area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBAColor)],
    placement: LegendMode,
    axis_x_start_px: i32,
) -> Result<()> {
    legend_area
        .fill(&WHITE)
        .map_err(|e| anyhow!("{:?}", e))?;
    let (w_u32, _) = legend_area.dim_in_pixel();
    let w = w_u32 as i32;
    let style: TextStyle =
        TextStyle::from((FontFamily::SansSerif, FONT_PX)).pos(Pos::new(HPos::Left, VPos::Center));

    match placement {
        LegendMode::Right => {
            let marker_x = PAD + MARKER_RADIUS;
            let text_x = marker_x + MARKER_TO_TEXT;
            let max_text_w = (w - text_x - PAD).max(40) as u32;
            let mut y = PAD * 2;
            for (label, color) in items {
                let lines = wrap_text_to_width(label, FONT_PX, max_text_w);
                let block_h = lines.len() as i32 * LINE_H;
                legend_area
                    .draw(&Circle::new(
                        (marker_x, y + block_h / 2),
                        MARKER_RADIUS,
                        color.filled(),
                    ))
                    .map_err(|e| anyhow!("{:?}", e))?;
                for (i, line) in lines.iter().enumerate() {
                    let cy = y + i as i32 * LINE_H + LINE_H / 2;
                    legend_area
                        .draw(&Text::new(line.as_str(), (text_x, cy), style.clone()))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
                y += block_h + ROW_GAP;
            }
        }
        LegendMode::Top | LegendMode::Bottom => {
            let labels: Vec<String> = items.iter().map(|(l, _)| l.clone()).collect();
            for (ri, row) in pack_rows(&labels, axis_x_start_px, w).iter().enumerate() {
                let cy = PAD + ri as i32 * (LINE_H + ROW_GAP) + LINE_H / 2;
                for (idx, text, x) in row {
                    let color = items[*idx].1;
                    legend_area
                        .draw(&Circle::new(
                            (*x + MARKER_RADIUS, cy),
                            MARKER_RADIUS,
                            color.filled(),
                        ))
                        .map_err(|e| anyhow!("{:?}", e))?;
                    legend_area
                        .draw(&Text::new(
                            text.as_str(),
                            (*x + MARKER_RADIUS + MARKER_TO_TEXT, cy),
                            style.clone(),
                        ))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
            }
        }
        LegendMode::Inside => {}
    }
    Ok(())
}
