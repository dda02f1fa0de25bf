//! File-backed collaborators: row sources, configuration and result output.

use crate::models::{CellValue, ChartConfig, ChartResult, ColorOverrides, Row};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Tabular data provider.
pub trait RowSource {
    fn rows(&self) -> Result<Vec<Row>>;
}

/// CSV file with a header row. Empty cells are null, everything else text.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: PathBuf,
    pub delimiter: u8,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl RowSource for CsvSource {
    fn rows(&self) -> Result<Vec<Row>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        let headers = rdr.headers()?.clone();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.with_context(|| format!("reading {}", self.path.display()))?;
            let cells = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| {
                    let cell = if v.trim().is_empty() {
                        CellValue::Null
                    } else {
                        CellValue::Text(v.to_string())
                    };
                    (h.to_string(), cell)
                })
                .collect();
            rows.push(Row::new(cells));
        }
        Ok(rows)
    }
}

/// JSON file holding an array of row objects.
#[derive(Debug, Clone)]
pub struct JsonSource {
    pub path: PathBuf,
}

impl JsonSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RowSource for JsonSource {
    fn rows(&self) -> Result<Vec<Row>> {
        read_json(&self.path)
    }
}

/// Pick a source by file extension (`.json`, otherwise CSV).
pub fn source_for<P: AsRef<Path>>(path: P) -> Box<dyn RowSource> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("json") => Box::new(JsonSource::new(path)),
        Some("tsv") => Box::new(CsvSource::new(path).with_delimiter(b'\t')),
        _ => Box::new(CsvSource::new(path)),
    }
}

fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Load a (possibly partial) chart configuration.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ChartConfig> {
    read_json(path)
}

/// Load `{ slot: { title: "#RRGGBB" } }` colour overrides.
pub fn load_color_overrides<P: AsRef<Path>>(path: P) -> Result<ColorOverrides> {
    read_json(path)
}

/// Save a chart result as pretty JSON. NaN values are written as `null`.
pub fn save_json<P: AsRef<Path>>(result: &ChartResult, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(result)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
