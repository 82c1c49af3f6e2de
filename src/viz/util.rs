//! Utility functions for visualization: colors, scaling, locale mapping, tick formatting.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

use super::text::estimate_text_width_px;

/// Microsoft Office (2013+) chart series palette.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    office_rgb(idx).to_rgba()
}

/// Opaque palette entry, cycling after ten.
pub fn office_rgb(idx: usize) -> RGBColor {
    OFFICE10[idx % OFFICE10.len()]
}

/// Pick a Y-axis scale and its label from the overall magnitude, e.g. (1e9, "billions").
/// Emission totals reach hundreds of billions of tons, so this keeps ticks short.
pub fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "trillions")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "billions")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "millions")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "thousands")
    } else {
        (1.0, "")
    }
}

/// Axis title with the scale word appended, e.g. "Emissions (tons), billions".
pub fn scaled_axis_title(base: &str, scale_word: &str) -> String {
    if scale_word.is_empty() {
        base.to_string()
    } else {
        format!("{base}, {scale_word}")
    }
}

/// Map a locale tag to a `num_format::Locale`. Defaults to English.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// Tick label for an already-scaled value: thousands separators for large
/// magnitudes, up to two decimals for small ones.
pub fn format_tick(v: f64, locale: &Locale) -> String {
    let a = v.abs();
    if a >= 1000.0 {
        (v.round() as i64).to_formatted_string(locale)
    } else {
        let prec = if a >= 100.0 {
            0
        } else if a >= 10.0 {
            1
        } else {
            2
        };
        let s = format!("{:.*}", prec, v);
        if prec > 0 && locale.decimal() != "." {
            s.replacen('.', locale.decimal(), 1)
        } else {
            s
        }
    }
}

/// Width of the left label area for the given scaled Y range, measured from the
/// same labels [`format_tick`] will produce. Clamped to 48..=140 px.
pub fn compute_left_label_area_px(
    ymin_scaled: f64,
    ymax_scaled: f64,
    ticks: usize,
    font_px: u32,
    locale: &Locale,
) -> u32 {
    let mut max_px = 0u32;
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let v = ymin_scaled + (ymax_scaled - ymin_scaled) * t;
        max_px = max_px.max(estimate_text_width_px(&format_tick(v, locale), font_px));
    }
    max_px.saturating_add(18).clamp(48, 140)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_words_follow_magnitude() {
        assert_eq!(choose_axis_scale(4.0e11), (1.0e9, "billions"));
        assert_eq!(choose_axis_scale(5.0e6), (1.0e6, "millions"));
        assert_eq!(choose_axis_scale(12.0), (1.0, ""));
    }

    #[test]
    fn ticks_use_locale_separators() {
        assert_eq!(format_tick(30000.0, map_locale("en")), "30,000");
        assert_eq!(format_tick(30000.0, map_locale("de")), "30.000");
        assert_eq!(format_tick(2.5, map_locale("de")), "2,50");
        assert_eq!(format_tick(250.0, map_locale("en")), "250");
    }
}
