use dashboard_analytics::aggregate::{
    Aggregation, GroupKey, MAX_PIVOT_GROUPS, OTHERS_LABEL, PieSlice, aggregate,
};
use dashboard_analytics::models::{
    CellValue, ChartConfig, ChartKind, GroupingMode, LabelTransform, Row,
};

fn row(cat: &str, value: f64) -> Row {
    Row::new(vec![
        ("Category".into(), CellValue::from(cat)),
        ("Sales".into(), CellValue::from(value)),
    ])
}

fn pie_config() -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Pie,
        grouping: GroupingMode::Pie,
        category_column: Some("Category".into()),
        ..ChartConfig::default()
    }
}

fn pivot_config() -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Bar,
        grouping: GroupingMode::Pivot,
        category_column: Some("Category".into()),
        ..ChartConfig::default()
    }
}

fn sales() -> Vec<String> {
    vec!["Sales".to_string()]
}

fn slices(data: &[Row], cfg: &ChartConfig) -> Vec<PieSlice> {
    let refs: Vec<&Row> = data.iter().collect();
    match aggregate(&refs, cfg, GroupingMode::Pie, &sales()).unwrap() {
        Aggregation::Pie { slices } => slices,
        other => panic!("expected pie aggregation, got {other:?}"),
    }
}

const LETTERS: [&str; 12] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"];

#[test]
fn pie_keeps_top_eight_and_folds_the_rest() {
    // Cat A = 12, Cat B = 11, ... Cat L = 1
    let data: Vec<Row> = LETTERS
        .iter()
        .enumerate()
        .map(|(i, l)| row(&format!("Cat {l}"), (12 - i) as f64))
        .collect();
    let got = slices(&data, &pie_config());
    assert_eq!(got.len(), 9);
    assert!(got[..8].iter().all(|s| !s.is_others));
    assert_eq!(got[0].title, "Cat A");
    assert_eq!(got[7].value, 5.0);
    let others = &got[8];
    assert!(others.is_others);
    assert_eq!(others.title, OTHERS_LABEL);
    assert_eq!(others.value, 4.0 + 3.0 + 2.0 + 1.0);
    assert_eq!(others.raw_names.len(), 4);
}

#[test]
fn zero_others_is_omitted() {
    let data: Vec<Row> = LETTERS
        .iter()
        .enumerate()
        .map(|(i, l)| row(&format!("Cat {l}"), if i < 8 { 10.0 + i as f64 } else { 0.0 }))
        .collect();
    let got = slices(&data, &pie_config());
    assert_eq!(got.len(), 8);
    assert!(got.iter().all(|s| s.title != OTHERS_LABEL));
}

#[test]
fn pie_without_grouping_column_has_one_slice_per_series() {
    let data = vec![
        Row::new(vec![("A".into(), CellValue::from(1.0)), ("B".into(), CellValue::from(2.0))]),
        Row::new(vec![("A".into(), CellValue::from(3.0)), ("B".into(), CellValue::from("4,5"))]),
    ];
    let refs: Vec<&Row> = data.iter().collect();
    let cfg = ChartConfig {
        kind: ChartKind::Pie,
        grouping: GroupingMode::Pie,
        ..ChartConfig::default()
    };
    let columns = vec!["A".to_string(), "B".to_string(), "Missing".to_string()];
    let Aggregation::Pie { slices } = aggregate(&refs, &cfg, GroupingMode::Pie, &columns).unwrap()
    else {
        panic!("expected pie aggregation");
    };
    assert_eq!(slices.len(), 2);
    assert_eq!((slices[0].title.as_str(), slices[0].value), ("A", 4.0));
    assert_eq!((slices[1].title.as_str(), slices[1].value), ("B", 6.5));
}

#[test]
fn pivot_keeps_top_thirty_by_value() {
    let data: Vec<Row> = (0..35).map(|i| row(&format!("Item {i:02}"), (i + 1) as f64)).collect();
    let refs: Vec<&Row> = data.iter().collect();
    let Aggregation::Grouped { groups, series, is_date_axis } =
        aggregate(&refs, &pivot_config(), GroupingMode::Pivot, &sales()).unwrap()
    else {
        panic!("expected grouped aggregation");
    };
    assert!(!is_date_axis);
    assert_eq!(groups.len(), MAX_PIVOT_GROUPS);
    assert_eq!(groups[0].label, "Item 34");
    assert_eq!(series[0].values[0], 35.0);
    assert_eq!(series[0].values[29], 6.0);
    assert!(series[0].values.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn pivot_sorts_dates_first_then_by_value() {
    let data = vec![
        row("2024-02-01", 1.0),
        row("Zeta", 100.0),
        row("2024-01-01", 2.0),
        row("Alpha", 50.0),
    ];
    let refs: Vec<&Row> = data.iter().collect();
    let Aggregation::Grouped { groups, .. } =
        aggregate(&refs, &pivot_config(), GroupingMode::Pivot, &sales()).unwrap()
    else {
        panic!("expected grouped aggregation");
    };
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["01.01.2024", "01.02.2024", "Zeta", "Alpha"]);
}

#[test]
fn cleaned_labels_merge_groups_and_keep_raw_names() {
    let data = vec![row("Store 1", 5.0), row("Store 2", 7.0), row("Depot", 1.0)];
    let refs: Vec<&Row> = data.iter().collect();
    let cfg = ChartConfig {
        label_transform: LabelTransform {
            hide_digits: true,
            ..LabelTransform::default()
        },
        ..pivot_config()
    };
    let Aggregation::Grouped { groups, series, .. } =
        aggregate(&refs, &cfg, GroupingMode::Pivot, &sales()).unwrap()
    else {
        panic!("expected grouped aggregation");
    };
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key, GroupKey::Category("Store".into()));
    assert_eq!(groups[0].raw_names, vec!["Store 1".to_string(), "Store 2".to_string()]);
    assert_eq!(series[0].values, vec![12.0, 1.0]);
}

#[test]
fn pivot_split_folds_small_categories_into_others() {
    let data: Vec<Row> = LETTERS[..10]
        .iter()
        .enumerate()
        .map(|(i, l)| {
            Row::new(vec![
                ("Category".into(), CellValue::from("Widgets")),
                ("Region".into(), CellValue::from(format!("Region {l}").as_str())),
                ("Sales".into(), CellValue::from((10 - i) as f64)),
            ])
        })
        .collect();
    let refs: Vec<&Row> = data.iter().collect();
    let cfg = ChartConfig {
        split_by: Some("Region".into()),
        ..pivot_config()
    };
    let Aggregation::Grouped { series, .. } =
        aggregate(&refs, &cfg, GroupingMode::Pivot, &sales()).unwrap()
    else {
        panic!("expected grouped aggregation");
    };
    assert_eq!(series.len(), 9);
    assert_eq!(series[0].split.as_ref().unwrap().title, "Region A");
    let others = series[8].split.as_ref().unwrap();
    assert!(others.is_others);
    assert_eq!(others.title, OTHERS_LABEL);
    assert_eq!(series[8].values, vec![3.0]);
}
