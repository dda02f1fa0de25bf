//! dashboard_analytics
//!
//! The analytics core of a business dashboard: reshape raw tabular rows into
//! aggregated chart series and place readable, non-overlapping data labels.
//! Pairs with the `dashan` CLI.
//!
//! ### Features
//! - Tolerant numeric parsing (`1.234,56`, `1,234.56`, `₺12%`)
//! - Daily / weekly / monthly buckets, categorical pivots, pie slices with "Others"
//! - Split-by fan-out, sum/average reducers, ratio ("price trend") series
//! - Volatility-based label selection and greedy label placement
//!
//! ### Example
//! ```no_run
//! use dashboard_analytics::{Pipeline, storage};
//! use dashboard_analytics::storage::RowSource;
//!
//! let rows = storage::CsvSource::new("sales.csv").rows()?;
//! let config = storage::load_config("chart.json")?;
//! let result = Pipeline::seeded(7).build(&rows, &config, &Default::default());
//! storage::save_json(&result, "chart_result.json")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod dates;
pub mod error;
pub mod filter;
pub mod labels;
pub mod models;
pub mod numeric;
pub mod pipeline;
pub mod series;
pub mod stats;
pub mod storage;
pub mod style;
pub mod viz;

pub use error::AnalyticsError;
pub use models::{CellValue, ChartConfig, ChartKind, ChartResult, GroupingMode, Point, Row, SeriesResult, SeriesSpec};
pub use numeric::normalize;
pub use pipeline::{Pipeline, build_chart, try_build_chart};
