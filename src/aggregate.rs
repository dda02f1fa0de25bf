//! Grouping and reduction of filtered rows into aligned value sequences.
//!
//! Three grouping families are supported:
//! - calendar buckets (day, ISO week starting Monday, month), sorted ascending
//! - categorical pivots over a cleaned category column, date-like keys first
//!   (ascending), then by the primary series' aggregate descending, top 30 kept
//! - pie slices, top 8 by aggregate plus a synthetic "Others" slice
//!
//! General mode keeps one group per row.
//!
//! Every produced series carries exactly one value per group so that sequences
//! stay aligned across splits. Empty combinations yield `0.0`, or `NaN` for
//! ratio series.

use ahash::AHashMap;
use chrono::NaiveDate;
use log::debug;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::dates::{self, CATEGORY_DATE_FORMAT};
use crate::error::AnalyticsError;
use crate::labels::category_key;
use crate::models::{ChartConfig, ChartKind, GroupingMode, Reducer, Row};
use crate::numeric::normalize;

/// Pivot groups kept before splitting.
pub const MAX_PIVOT_GROUPS: usize = 30;
/// Named pie slices / pivot split categories kept before folding into "Others".
pub const MAX_NAMED_CATEGORIES: usize = 8;
pub const OTHERS_LABEL: &str = "Others";

/// Key of one group on the x axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    Bucket(NaiveDate),
    Category(String),
    /// Ordinal of a row in General mode.
    Row(usize),
}

/// A group with its member rows.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: GroupKey,
    /// Display label (axis text).
    pub label: String,
    /// Original raw keys merged into this group.
    pub raw_names: Vec<String>,
    pub rows: Vec<&'a Row>,
}

/// Group metadata kept after reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisGroup {
    pub key: GroupKey,
    pub label: String,
    pub raw_names: Vec<String>,
}

impl AxisGroup {
    /// x coordinate: timestamp for calendar buckets, ordinal otherwise.
    pub fn x(&self, index: usize) -> f64 {
        match &self.key {
            GroupKey::Bucket(d) => dates::timestamp(*d),
            _ => index as f64,
        }
    }
}

/// One value of the split-by column (possibly several raw values merged).
#[derive(Debug, Clone, PartialEq)]
pub struct SplitCategory {
    pub title: String,
    pub raw_names: Vec<String>,
    pub is_others: bool,
}

impl SplitCategory {
    fn matches(&self, split_col: &str, row: &Row) -> bool {
        let key = category_key(row.get(split_col));
        self.raw_names.iter().any(|r| *r == key)
    }
}

/// One aligned value sequence for (column, split).
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    /// Source column, or `numerator/denominator` for ratio series.
    pub column: String,
    /// `None` when no split column is configured.
    pub split: Option<SplitCategory>,
    pub values: Vec<f64>,
}

/// One pie slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub title: String,
    pub raw_names: Vec<String>,
    pub value: f64,
    pub is_others: bool,
}

/// Reduction output.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    Grouped {
        groups: Vec<AxisGroup>,
        series: Vec<AggregatedSeries>,
        is_date_axis: bool,
    },
    Pie { slices: Vec<PieSlice> },
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        match self {
            Aggregation::Grouped { groups, series, .. } => groups.is_empty() || series.is_empty(),
            Aggregation::Pie { slices } => slices.is_empty(),
        }
    }
}

/// Group and reduce `rows` under `mode` for the given (present) series columns.
pub fn aggregate(
    rows: &[&Row],
    config: &ChartConfig,
    mode: GroupingMode,
    columns: &[String],
) -> Result<Aggregation, AnalyticsError> {
    let primary = columns.first().ok_or(AnalyticsError::NoSeries)?;
    let reducer = config.reducer();

    if config.kind == ChartKind::Pie {
        return Ok(pie_aggregation(rows, config, columns));
    }

    let category_col = || {
        config
            .category_column
            .as_deref()
            .ok_or(AnalyticsError::MissingCategoryColumn(mode))
    };

    let (groups, is_date_axis) = match mode {
        m if m.is_time_bucketed() => (time_groups(rows, category_col()?, m), true),
        GroupingMode::Pivot => {
            let mut groups = category_groups(rows, category_col()?, config);
            sort_category_groups(&mut groups, primary, reducer);
            groups.truncate(MAX_PIVOT_GROUPS);
            (groups, false)
        }
        GroupingMode::Pie => return Ok(pie_aggregation(rows, config, columns)),
        _ => (general_groups(rows, config.category_column.as_deref()), false),
    };

    let splits = match config.effective_split() {
        None => vec![None],
        Some(split_col) => {
            let ranking = (mode == GroupingMode::Pivot).then_some((primary.as_str(), reducer));
            split_categories(rows, split_col, config, ranking)
                .into_iter()
                .map(Some)
                .collect()
        }
    };
    let split_col = config.effective_split().unwrap_or_default();

    let mut series = Vec::new();
    if config.kind == ChartKind::Ratio {
        if columns.len() < 2 {
            return Err(AnalyticsError::RatioNeedsTwoSeries(columns.len()));
        }
        let (num, den) = (&columns[0], &columns[1]);
        for split in splits {
            let values: Vec<f64> = groups
                .iter()
                .map(|g| ratio_value(&split_members(&g.rows, split_col, split.as_ref()), num, den))
                .collect();
            if split.is_some() && !values.iter().any(|v| v.is_finite() && *v > 0.0) {
                debug!("dropping empty ratio split {:?}", split.as_ref().map(|s| &s.title));
                continue;
            }
            series.push(AggregatedSeries {
                column: format!("{num}/{den}"),
                split,
                values,
            });
        }
    } else {
        for column in columns {
            for split in &splits {
                let values = groups
                    .iter()
                    .map(|g| {
                        let rows = split_members(&g.rows, split_col, split.as_ref());
                        reduce_column(&rows, column, reducer).unwrap_or(0.0)
                    })
                    .collect();
                series.push(AggregatedSeries {
                    column: column.clone(),
                    split: split.clone(),
                    values,
                });
            }
        }
    }

    let groups = groups
        .into_iter()
        .map(|g| AxisGroup {
            key: g.key,
            label: g.label,
            raw_names: g.raw_names,
        })
        .collect();
    Ok(Aggregation::Grouped {
        groups,
        series,
        is_date_axis,
    })
}

fn pie_aggregation(rows: &[&Row], config: &ChartConfig, columns: &[String]) -> Aggregation {
    let group_col = config
        .effective_split()
        .or(config.category_column.as_deref());
    let slices = pie_slices(rows, config, columns, group_col);
    debug!("pie aggregation produced {} slices", slices.len());
    Aggregation::Pie { slices }
}

/// Rows of `rows` belonging to `split`; all of them for the default split.
fn split_members<'a>(rows: &[&'a Row], split_col: &str, split: Option<&SplitCategory>) -> Vec<&'a Row> {
    rows.iter()
        .copied()
        .filter(|r| split.is_none_or(|s| s.matches(split_col, r)))
        .collect()
}

/// Reduce `column` over the rows that carry it; `None` when no row does.
pub fn reduce_column(rows: &[&Row], column: &str, reducer: Reducer) -> Option<f64> {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.get(column))
        .map(normalize)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(reducer.reduce(&values))
    }
}

/// `sum(numerator) / sum(denominator)`, NaN for no rows or a zero denominator.
pub fn ratio_value(rows: &[&Row], numerator: &str, denominator: &str) -> f64 {
    if rows.is_empty() {
        return f64::NAN;
    }
    let num = reduce_column(rows, numerator, Reducer::Sum).unwrap_or(0.0);
    let den = reduce_column(rows, denominator, Reducer::Sum).unwrap_or(0.0);
    if den == 0.0 { f64::NAN } else { num / den }
}

/// Calendar buckets, ascending. Rows without a parsable date are dropped.
pub fn time_groups<'a>(rows: &[&'a Row], date_col: &str, mode: GroupingMode) -> Vec<Group<'a>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&'a Row>> = BTreeMap::new();
    for row in rows {
        if let Some(dt) = row.get(date_col).and_then(dates::parse_date) {
            buckets
                .entry(dates::bucket(dt.date(), mode))
                .or_default()
                .push(*row);
        }
    }
    buckets
        .into_iter()
        .map(|(day, rows)| Group {
            key: GroupKey::Bucket(day),
            label: dates::format_bucket(day, mode),
            raw_names: vec![day.format(CATEGORY_DATE_FORMAT).to_string()],
            rows,
        })
        .collect()
}

/// Categorical groups merged by cleaned display key, in first-seen order.
pub fn category_groups<'a>(rows: &[&'a Row], col: &str, config: &ChartConfig) -> Vec<Group<'a>> {
    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();
    for row in rows {
        let raw = category_key(row.get(col));
        let display = config.label_transform.apply(&raw);
        let slot = *index.entry(display.clone()).or_insert_with(|| {
            groups.push(Group {
                key: GroupKey::Category(display.clone()),
                label: display.clone(),
                raw_names: Vec::new(),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        if !group.raw_names.contains(&raw) {
            group.raw_names.push(raw);
        }
        group.rows.push(*row);
    }
    groups
}

/// Date of a `dd.MM.yyyy` key, if the group is date-like.
fn group_date(group: &Group<'_>) -> Option<NaiveDate> {
    group
        .raw_names
        .first()
        .and_then(|raw| NaiveDate::parse_from_str(raw, CATEGORY_DATE_FORMAT).ok())
}

/// Date-like groups first (ascending), then by primary aggregate descending.
pub fn sort_category_groups<'a>(groups: &mut Vec<Group<'a>>, primary: &str, reducer: Reducer) {
    let mut keyed: Vec<(Option<NaiveDate>, f64, Group<'a>)> = groups
        .drain(..)
        .map(|g| {
            let agg = reduce_column(&g.rows, primary, reducer).unwrap_or(0.0);
            (group_date(&g), agg, g)
        })
        .collect();
    keyed.sort_by(|a, b| match (a.0, b.0) {
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.1.total_cmp(&a.1),
    });
    groups.extend(keyed.into_iter().map(|(_, _, g)| g));
}

/// One group per row, labelled by the category column or the row ordinal.
pub fn general_groups<'a>(rows: &[&'a Row], col: Option<&str>) -> Vec<Group<'a>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let label = match col {
                Some(c) => category_key(row.get(c)),
                None => (i + 1).to_string(),
            };
            Group {
                key: GroupKey::Row(i),
                label: label.clone(),
                raw_names: vec![label],
                rows: vec![*row],
            }
        })
        .collect()
}

/// Distinct split categories honouring the user's selection.
///
/// With `ranking`, categories are ordered by the aggregate of the given column
/// (descending); the top 8 stay named and the rest fold into "Others", which
/// is dropped when its aggregate is exactly zero. Without it they are ordered
/// by title.
pub fn split_categories(
    rows: &[&Row],
    split_col: &str,
    config: &ChartConfig,
    ranking: Option<(&str, Reducer)>,
) -> Vec<SplitCategory> {
    let selected: BTreeSet<&str> = config.split_categories.iter().map(String::as_str).collect();
    let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for row in rows {
        let raw = category_key(row.get(split_col));
        let display = config.label_transform.apply(&raw);
        if !selected.is_empty()
            && !selected.contains(raw.as_str())
            && !selected.contains(display.as_str())
        {
            continue;
        }
        let raws = merged.entry(display).or_default();
        if !raws.contains(&raw) {
            raws.push(raw);
        }
    }
    let mut cats: Vec<SplitCategory> = merged
        .into_iter()
        .map(|(title, raw_names)| SplitCategory {
            title,
            raw_names,
            is_others: false,
        })
        .collect();

    let Some((column, reducer)) = ranking else {
        return cats;
    };
    let mut scored: Vec<(SplitCategory, f64)> = cats
        .drain(..)
        .map(|c| {
            let v = reduce_column(&split_members(rows, split_col, Some(&c)), column, reducer)
                .unwrap_or(0.0);
            (c, v)
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    if scored.len() <= MAX_NAMED_CATEGORIES {
        return scored.into_iter().map(|(c, _)| c).collect();
    }

    let rest = scored.split_off(MAX_NAMED_CATEGORIES);
    let mut out: Vec<SplitCategory> = scored.into_iter().map(|(c, _)| c).collect();
    let others = SplitCategory {
        title: OTHERS_LABEL.to_string(),
        raw_names: rest.into_iter().flat_map(|(c, _)| c.raw_names).collect(),
        is_others: true,
    };
    let others_value =
        reduce_column(&split_members(rows, split_col, Some(&others)), column, reducer).unwrap_or(0.0);
    if others_value != 0.0 {
        out.push(others);
    }
    out
}

/// Pie slices: per category of `group_col` (top 8 + "Others"), or one slice
/// per series column when there is no grouping column.
pub fn pie_slices(
    rows: &[&Row],
    config: &ChartConfig,
    columns: &[String],
    group_col: Option<&str>,
) -> Vec<PieSlice> {
    let reducer = config.reducer();
    let Some(col) = group_col else {
        return columns
            .iter()
            .filter_map(|c| {
                reduce_column(rows, c, reducer).map(|value| PieSlice {
                    title: c.clone(),
                    raw_names: vec![c.clone()],
                    value,
                    is_others: false,
                })
            })
            .collect();
    };
    let Some(primary) = columns.first() else {
        return Vec::new();
    };

    let mut scored: Vec<(Group<'_>, f64)> = category_groups(rows, col, config)
        .into_iter()
        .map(|g| {
            let v = reduce_column(&g.rows, primary, reducer).unwrap_or(0.0);
            (g, v)
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let rest = if scored.len() > MAX_NAMED_CATEGORIES {
        scored.split_off(MAX_NAMED_CATEGORIES)
    } else {
        Vec::new()
    };
    let mut slices: Vec<PieSlice> = scored
        .into_iter()
        .map(|(g, value)| PieSlice {
            title: g.label,
            raw_names: g.raw_names,
            value,
            is_others: false,
        })
        .collect();

    if !rest.is_empty() {
        let rest_rows: Vec<&Row> = rest.iter().flat_map(|(g, _)| g.rows.iter().copied()).collect();
        let value = reduce_column(&rest_rows, primary, reducer).unwrap_or(0.0);
        if value != 0.0 {
            slices.push(PieSlice {
                title: OTHERS_LABEL.to_string(),
                raw_names: rest.into_iter().flat_map(|(g, _)| g.raw_names).collect(),
                value,
                is_others: true,
            });
        }
    }
    slices
}
