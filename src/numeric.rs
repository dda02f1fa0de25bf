//! Locale-ambiguous numeric parsing for raw cell values.
//!
//! Every failure maps to `0.0`. A malformed cell is therefore indistinguishable
//! from a real zero; callers that need to tell them apart must inspect the cell.

use crate::models::CellValue;

/// Currency markers stripped before parsing.
const CURRENCY_MARKERS: [&str; 9] = ["₺", "$", "€", "£", "¥", "TL", "TRY", "USD", "EUR"];

/// Parse a cell into a finite `f64`, falling back to `0.0`.
pub fn normalize(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(v) if v.is_finite() => *v,
        CellValue::Text(s) => normalize_str(s),
        _ => 0.0,
    }
}

/// Same as [`normalize`] for an optional cell; `None` is `0.0`.
pub fn normalize_opt(value: Option<&CellValue>) -> f64 {
    value.map(normalize).unwrap_or(0.0)
}

/// Parse decorated text such as `"₺1.234,56"`, `"1,234.56"` or `"12%"`.
///
/// Whichever of `,` / `.` occurs last is the decimal separator; the other one
/// is a thousands separator. A lone comma is a decimal separator.
pub fn normalize_str(raw: &str) -> f64 {
    let mut s = raw.to_string();
    for marker in CURRENCY_MARKERS {
        s = s.replace(marker, "");
    }
    let s: String = s
        .chars()
        .filter(|c| *c != '%' && !c.is_whitespace())
        .collect();
    if s.is_empty() {
        return 0.0;
    }

    let cleaned = match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (Some(_), None) => s.replace(',', "."),
        (None, _) => s,
    };

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
