use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel split selection meaning "do not split at all".
pub const SPLIT_NONE_SENTINEL: &str = "(none)";

/// Default number of visible labels per series.
pub const DEFAULT_LABEL_BUDGET: usize = 12;

/// One typed cell of a source row.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Date(NaiveDateTime),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}

/// Serde: accept JSON null, numbers, booleans and strings as a cell.
/// Dates arrive as strings and are resolved later by the tolerant date parser.
impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        struct CellVisitor;

        impl<'de> Visitor<'de> for CellVisitor {
            type Value = CellValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "null, a number or a string")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(CellValue::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(CellValue::Null)
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(CellValue::Text(v.to_string()))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(CellValue::Number(v as f64))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(CellValue::Number(v as f64))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(CellValue::Number(v))
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(CellValue::Text(s.to_string()))
            }
        }

        deserializer.deserialize_any(CellVisitor)
    }
}

/// Ordered mapping from column name to cell. Immutable once read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new(cells: Vec<(String, CellValue)>) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (k, v) in &self.cells {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Rows deserialize from a JSON object; cell order follows document order.
impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{MapAccess, Visitor};
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "an object mapping column names to cells")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut cells = Vec::new();
                while let Some((k, v)) = map.next_entry::<String, CellValue>()? {
                    cells.push((k, v));
                }
                Ok(Row::new(cells))
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Chart kind tag handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Pie,
    /// Numerator/denominator series ("price trend").
    Ratio,
}

impl ChartKind {
    /// Line-like kinds get the label placement solver; the rest get fixed offsets.
    pub fn is_line_like(self) -> bool {
        matches!(self, ChartKind::Line | ChartKind::Ratio)
    }

    /// Maximum number of distinct series columns honoured for this kind.
    pub fn series_limit(self) -> usize {
        match self {
            ChartKind::Line | ChartKind::Bar => 10,
            ChartKind::Ratio => 2,
            ChartKind::Pie => 10,
        }
    }
}

/// How rows are grouped into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    #[default]
    Daily,
    Weekly,
    Monthly,
    /// Categorical pivot over a non-date column.
    Pivot,
    Pie,
    /// One point per row, no grouping.
    General,
}

impl GroupingMode {
    pub fn is_time_bucketed(self) -> bool {
        matches!(self, GroupingMode::Daily | GroupingMode::Weekly | GroupingMode::Monthly)
    }
}

/// Group reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reducer {
    Sum,
    Average,
}

impl Reducer {
    /// "Average" (any case) selects averaging; everything else sums.
    pub fn from_aggregation_type(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("average") {
            Reducer::Average
        } else {
            Reducer::Sum
        }
    }

    pub fn reduce(self, values: &[f64]) -> f64 {
        let sum: f64 = values.iter().sum();
        match self {
            Reducer::Sum => sum,
            Reducer::Average if values.is_empty() => 0.0,
            Reducer::Average => sum / values.len() as f64,
        }
    }
}

/// One data column to aggregate. `id` is stable across edits of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub id: u32,
    pub column: String,
}

impl SeriesSpec {
    pub fn new(id: u32, column: impl Into<String>) -> Self {
        Self {
            id,
            column: column.into(),
        }
    }
}

/// Text transform applied to category labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LabelTransform {
    pub hide_digits: bool,
    pub first_token_only: bool,
    /// Everything from the first occurrence of this separator on is dropped.
    pub truncate_after: Option<String>,
}

/// Fractional row-range selection (`start/max` .. `end/max`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSlider {
    pub start: f64,
    pub end: f64,
    pub max: f64,
}

/// Full chart configuration as edited by the settings surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Key used for colour overrides.
    pub slot: String,
    pub kind: ChartKind,
    pub grouping: GroupingMode,
    /// Date column for time modes, category column for pivot/pie/general.
    pub category_column: Option<String>,
    pub split_by: Option<String>,
    /// Empty = all categories; containing the sentinel = no split.
    pub split_categories: Vec<String>,
    pub series: Vec<SeriesSpec>,
    /// "Sum" or "Average" (case-insensitive).
    pub aggregation_type: String,
    pub rows_to_ignore: usize,
    pub ignore_non_date_rows: bool,
    /// A daily chart restricted by a date filter ignores the slider.
    pub date_filter_active: bool,
    pub slider: Option<RangeSlider>,
    /// Render label numbers with comma decimals (`1.234,5`).
    pub comma_decimal: bool,
    pub label_transform: LabelTransform,
    pub label_budget: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            slot: "chart".into(),
            kind: ChartKind::Line,
            grouping: GroupingMode::Daily,
            category_column: None,
            split_by: None,
            split_categories: Vec::new(),
            series: Vec::new(),
            aggregation_type: "Sum".into(),
            rows_to_ignore: 0,
            ignore_non_date_rows: false,
            date_filter_active: false,
            slider: None,
            comma_decimal: false,
            label_transform: LabelTransform::default(),
            label_budget: DEFAULT_LABEL_BUDGET,
        }
    }
}

impl ChartConfig {
    pub fn reducer(&self) -> Reducer {
        Reducer::from_aggregation_type(&self.aggregation_type)
    }

    /// Split column in effect, honouring the "(none)" sentinel.
    pub fn effective_split(&self) -> Option<&str> {
        if self.split_categories.iter().any(|c| c == SPLIT_NONE_SENTINEL) {
            return None;
        }
        self.split_by.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Label offset relative to the data point, in screen pixels (y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

/// One chart point. `y` is NaN for "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub label: Option<String>,
    pub important: bool,
    pub offset: Option<Offset>,
    pub visible: bool,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            label: None,
            important: false,
            offset: None,
            visible: false,
        }
    }

    pub fn with_importance(self, important: bool) -> Self {
        Self { important, ..self }
    }

    pub fn with_offset(self, offset: Offset) -> Self {
        Self {
            offset: Some(offset),
            ..self
        }
    }
}

/// One renderable series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesResult {
    pub title: String,
    /// Uncleaned name(s) for tooltips.
    pub tooltip_name: String,
    pub kind: ChartKind,
    pub points: Vec<Point>,
    /// Set for pie slices instead of points.
    pub pie_value: Option<f64>,
    /// `#RRGGBB`
    pub color: String,
}

/// Grouping actually used, when it differs from the configured one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingDecision {
    pub requested: GroupingMode,
    pub effective: GroupingMode,
    pub reason: Option<String>,
}

impl GroupingDecision {
    pub fn unchanged(mode: GroupingMode) -> Self {
        Self {
            requested: mode,
            effective: mode,
            reason: None,
        }
    }

    pub fn changed(&self) -> bool {
        self.requested != self.effective
    }
}

/// Output consumed by the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    pub series: Vec<SeriesResult>,
    pub x_axis_labels: Option<Vec<String>>,
    pub is_date_axis: bool,
    pub grouping: Option<GroupingDecision>,
}

impl ChartResult {
    pub fn empty() -> Self {
        Self {
            series: Vec::new(),
            x_axis_labels: None,
            is_date_axis: false,
            grouping: None,
        }
    }
}

/// Caller-supplied colours: slot -> series title -> `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ColorOverrides(pub BTreeMap<String, BTreeMap<String, String>>);

impl ColorOverrides {
    pub fn get(&self, slot: &str, title: &str) -> Option<&str> {
        self.0.get(slot)?.get(title).map(String::as_str)
    }

    pub fn insert(&mut self, slot: impl Into<String>, title: impl Into<String>, hex: impl Into<String>) {
        self.0
            .entry(slot.into())
            .or_default()
            .insert(title.into(), hex.into());
    }
}
