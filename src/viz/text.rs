//! Label text: value formatting and width-bounded truncation.

use num_format::{Locale, ToFormattedString};

/// Font size assumed for axis labels.
pub const AXIS_FONT_PX: u32 = 12;
/// Widest category axis label before truncation.
pub const AXIS_LABEL_MAX_PX: u32 = 120;

/// Locale and decimal separator for label numbers.
pub fn number_locale(comma_decimal: bool) -> (&'static Locale, char) {
    if comma_decimal {
        (&Locale::de, ',')
    } else {
        (&Locale::en, '.')
    }
}

/// Format a point value for its label: thousands separators, whole numbers
/// from 1000 up, otherwise at most two trimmed decimals. `None` for NaN.
pub fn format_value_label(value: f64, comma_decimal: bool) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let (locale, dec_sep) = number_locale(comma_decimal);
    if value.abs() >= 1000.0 {
        return Some((value.round() as i64).to_formatted_string(locale));
    }

    let cents = (value.abs() * 100.0).round() as i64;
    let (whole, frac) = (cents / 100, cents % 100);
    let sign = if value < 0.0 && cents != 0 { "-" } else { "" };
    let mut out = format!("{sign}{}", whole.to_formatted_string(locale));
    if frac != 0 {
        let digits = format!("{frac:02}");
        out.push(dec_sep);
        out.push_str(digits.trim_end_matches('0'));
    }
    Some(out)
}

/// Heuristic: estimate pixel width of text.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let ellipsis_px = estimate_text_width_px("…", font_px);
    if ellipsis_px > max_px {
        return String::new();
    }
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if estimate_text_width_px(&out, font_px) + ellipsis_px > max_px {
            out.pop();
            break;
        }
    }
    out.push('…');
    out
}
