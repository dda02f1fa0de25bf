use dashboard_analytics::models::{CellValue, ChartKind, GroupingMode};
use dashboard_analytics::storage::{
    self, CsvSource, JsonSource, RowSource, load_color_overrides, load_config, save_json,
};
use dashboard_analytics::{ChartConfig, Pipeline};
use std::fs;
use tempfile::tempdir;

#[test]
fn partial_config_fills_defaults() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("chart.json");
    fs::write(
        &p,
        r#"{
            "slot": "revenue",
            "kind": "ratio",
            "grouping": "weekly",
            "category_column": "Date",
            "series": [{"id": 1, "column": "Revenue"}, {"id": 2, "column": "Units"}],
            "aggregation_type": "average"
        }"#,
    )
    .unwrap();
    let cfg = load_config(&p).unwrap();
    assert_eq!(cfg.kind, ChartKind::Ratio);
    assert_eq!(cfg.grouping, GroupingMode::Weekly);
    assert_eq!(cfg.series.len(), 2);
    assert_eq!(cfg.label_budget, 12);
    assert_eq!(cfg.rows_to_ignore, 0);
    assert_eq!(cfg.reducer(), dashboard_analytics::models::Reducer::Average);
}

#[test]
fn json_rows_keep_column_order_and_types() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("rows.json");
    fs::write(
        &p,
        r#"[{"Zeta": "x", "Alpha": 1.5, "Mid": null}, {"Zeta": "y", "Alpha": 2}]"#,
    )
    .unwrap();
    let rows = JsonSource::new(&p).rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mid"]);
    assert_eq!(rows[0].get("Alpha"), Some(&CellValue::Number(1.5)));
    assert_eq!(rows[0].get("Mid"), Some(&CellValue::Null));
    assert_eq!(rows[1].get("Alpha"), Some(&CellValue::Number(2.0)));
}

#[test]
fn tsv_rows_and_colour_overrides() {
    let dir = tempdir().unwrap();
    let tsv = dir.path().join("rows.tsv");
    fs::write(&tsv, "Date\tAmount\n2024-01-01\t5\n").unwrap();
    let rows = storage::source_for(&tsv).rows().unwrap();
    assert_eq!(rows[0].get("Amount"), Some(&CellValue::from("5")));

    let colors = dir.path().join("colors.json");
    fs::write(&colors, r##"{"sales": {"North": "#123456"}}"##).unwrap();
    let overrides = load_color_overrides(&colors).unwrap();
    assert_eq!(overrides.get("sales", "North"), Some("#123456"));
    assert_eq!(overrides.get("sales", "South"), None);
}

#[test]
fn csv_to_result_json_roundtrip_through_pipeline() {
    let dir = tempdir().unwrap();
    let csvp = dir.path().join("sales.csv");
    fs::write(
        &csvp,
        "Date,Amount\n2024-01-01,\"1.000,50\"\n2024-01-02,\n2024-01-02,\"2,5\"\n",
    )
    .unwrap();
    let rows = CsvSource::new(&csvp).rows().unwrap();
    let cfg = ChartConfig {
        category_column: Some("Date".into()),
        series: vec![dashboard_analytics::SeriesSpec::new(1, "Amount")],
        ..ChartConfig::default()
    };
    let result = Pipeline::seeded(2).build(&rows, &cfg, &Default::default());
    let ys: Vec<f64> = result.series[0].points.iter().map(|p| p.y).collect();
    assert_eq!(ys, vec![1000.5, 2.5]);

    let out = dir.path().join("out.json");
    save_json(&result, &out).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["series"][0]["title"], "Amount");
    assert_eq!(v["is_date_axis"], true);
    assert_eq!(v["series"][0]["points"].as_array().unwrap().len(), 2);
}
