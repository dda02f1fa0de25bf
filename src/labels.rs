//! Category keys and display-label cleaning.

use regex::Regex;
use std::sync::OnceLock;

use crate::dates::{CATEGORY_DATE_FORMAT, parse_date_str};
use crate::models::{CellValue, LabelTransform};

/// Placeholder for blank or missing categories.
pub const MISSING_CATEGORY: &str = "NA";

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Raw categorical key of a cell: dates as `dd.MM.yyyy`, date-looking text
/// normalized the same way, other text verbatim, blanks as `NA`.
pub fn category_key(value: Option<&CellValue>) -> String {
    match value {
        None | Some(CellValue::Null) => MISSING_CATEGORY.to_string(),
        Some(CellValue::Date(d)) => d.format(CATEGORY_DATE_FORMAT).to_string(),
        Some(CellValue::Number(v)) => v.to_string(),
        Some(CellValue::Text(s)) if s.trim().is_empty() => MISSING_CATEGORY.to_string(),
        Some(CellValue::Text(s)) => match parse_date_str(s) {
            Some(d) => d.format(CATEGORY_DATE_FORMAT).to_string(),
            None => s.clone(),
        },
    }
}

impl LabelTransform {
    /// Clean a raw key into its display form. Never returns an empty string.
    pub fn apply(&self, raw: &str) -> String {
        let mut s = raw;
        if let Some(sep) = self.truncate_after.as_deref().filter(|sep| !sep.is_empty())
            && let Some(idx) = s.find(sep)
        {
            s = &s[..idx];
        }
        let stripped = if self.hide_digits {
            digits_re().replace_all(s, "").into_owned()
        } else {
            s.to_string()
        };
        let collapsed = whitespace_re().replace_all(stripped.trim(), " ").into_owned();
        let cleaned = if self.first_token_only {
            collapsed.split(' ').next().unwrap_or_default().to_string()
        } else {
            collapsed
        };

        if !cleaned.is_empty() {
            cleaned
        } else if !raw.trim().is_empty() {
            raw.trim().to_string()
        } else {
            MISSING_CATEGORY.to_string()
        }
    }
}
