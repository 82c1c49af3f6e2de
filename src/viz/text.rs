//! Text measurement, truncation, and wrapping for chart labels.

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Truncate to fit `max_px`, ending with a single ellipsis when shortened.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if estimate_text_width_px(&format!("{out}…"), font_px) > max_px {
            out.pop();
            break;
        }
    }
    out.push('…');
    out
}

/// Wrap on word boundaries; a single word wider than the line is truncated.
pub fn wrap_text_to_width(text: &str, font_px: u32, max_px: u32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let candidate = if cur.is_empty() {
            word.to_string()
        } else {
            format!("{cur} {word}")
        };
        if estimate_text_width_px(&candidate, font_px) <= max_px {
            cur = candidate;
            continue;
        }
        if !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
        }
        if estimate_text_width_px(word, font_px) <= max_px {
            cur = word.to_string();
        } else {
            lines.push(truncate_to_width(word, font_px, max_px));
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_adds_one_ellipsis() {
        let s = truncate_to_width("Asia and Pacific (other)", 10, 60);
        assert!(s.ends_with('…'));
        assert!(estimate_text_width_px(&s, 10) <= 60);
        assert_eq!(truncate_to_width("Chad", 10, 60), "Chad");
    }

    #[test]
    fn wrapping_breaks_on_spaces() {
        let lines = wrap_text_to_width("Americas (other)", 10, 60);
        assert_eq!(lines, vec!["Americas", "(other)"]);
    }
}
