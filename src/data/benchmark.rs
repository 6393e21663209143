//! Genre / geo benchmark datasets (GameAnalytics retention and ARPDAU).
//!
//! Benchmarks are advisory: they help pick sensible inputs but never feed the
//! fit or projection.

use std::collections::BTreeSet;
use std::io::Read;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::AppError;

const DEFAULT_RETENTION_URL: &str =
    "https://raw.githubusercontent.com/svenjuergens84/ltv-prediction/main/final_retention_clean_row_grouped.csv";
const DEFAULT_ARPDAU_URL: &str =
    "https://raw.githubusercontent.com/svenjuergens84/ltv-prediction/main/final_arpdau_clean_row_grouped.csv";

/// Days reported by the retention benchmark.
pub const BENCHMARK_DAYS: [u32; 3] = [1, 7, 28];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetentionBenchmarkRow {
    pub geo: String,
    pub day: u32,
    pub genre_name: String,
    /// Retention in percent.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArpdauBenchmarkRow {
    pub metric: String,
    pub geo: String,
    pub genre_name: String,
    pub value: f64,
}

/// Benchmark values for one genre / geo pair.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkDefaults {
    pub genre: String,
    pub geo: String,
    /// `(day, retention percent)` sorted by day.
    pub retention_percent: Vec<(u32, f64)>,
    pub arpdau: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct BenchmarkTable {
    retention: Vec<RetentionBenchmarkRow>,
    arpdau: Vec<ArpdauBenchmarkRow>,
}

impl BenchmarkTable {
    /// Parse both CSV datasets. Extra columns are ignored.
    pub fn from_readers<R1: Read, R2: Read>(retention: R1, arpdau: R2) -> Result<Self, AppError> {
        let retention = read_rows::<_, RetentionBenchmarkRow>(retention, "retention")?;
        let arpdau = read_rows::<_, ArpdauBenchmarkRow>(arpdau, "ARPDAU")?;
        Ok(Self { retention, arpdau })
    }

    pub fn genres(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.retention.iter().map(|r| r.genre_name.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    pub fn geos(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.retention.iter().map(|r| r.geo.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Benchmarks for one genre / geo pair; `None` when the pair has no retention rows.
    pub fn lookup(&self, genre: &str, geo: &str) -> Option<BenchmarkDefaults> {
        let mut retention_percent: Vec<(u32, f64)> = self
            .retention
            .iter()
            .filter(|r| r.genre_name == genre && r.geo == geo && BENCHMARK_DAYS.contains(&r.day))
            .map(|r| (r.day, r.value))
            .collect();
        if retention_percent.is_empty() {
            return None;
        }
        retention_percent.sort_by_key(|(day, _)| *day);

        let arpdau = self
            .arpdau
            .iter()
            .find(|r| r.metric == "arpdau" && r.genre_name == genre && r.geo == geo)
            .map(|r| r.value);

        Some(BenchmarkDefaults {
            genre: genre.to_string(),
            geo: geo.to_string(),
            retention_percent,
            arpdau,
        })
    }
}

fn read_rows<R: Read, T: for<'de> Deserialize<'de>>(reader: R, label: &str) -> Result<Vec<T>, AppError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut out = Vec::new();
    for (idx, row) in rdr.deserialize::<T>().enumerate() {
        let row = row.map_err(|e| {
            AppError::new(4, format!("Invalid {label} benchmark row {}: {e}", idx + 2))
        })?;
        out.push(row);
    }
    Ok(out)
}

pub struct BenchmarkClient {
    client: Client,
    retention_url: String,
    arpdau_url: String,
}

impl BenchmarkClient {
    /// Build a client; URLs may be overridden via environment (or `.env`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let retention_url = std::env::var("LTV_RETENTION_BENCHMARK_URL")
            .unwrap_or_else(|_| DEFAULT_RETENTION_URL.to_string());
        let arpdau_url =
            std::env::var("LTV_ARPDAU_BENCHMARK_URL").unwrap_or_else(|_| DEFAULT_ARPDAU_URL.to_string());
        Self {
            client: Client::new(),
            retention_url,
            arpdau_url,
        }
    }

    pub fn fetch_table(&self) -> Result<BenchmarkTable, AppError> {
        info!(url = %self.retention_url, "fetching retention benchmarks");
        let retention = self.fetch_text(&self.retention_url)?;
        info!(url = %self.arpdau_url, "fetching ARPDAU benchmarks");
        let arpdau = self.fetch_text(&self.arpdau_url)?;

        let table = BenchmarkTable::from_readers(retention.as_bytes(), arpdau.as_bytes())?;
        debug!(
            retention_rows = table.retention.len(),
            arpdau_rows = table.arpdau.len(),
            "parsed benchmark tables"
        );
        Ok(table)
    }

    fn fetch_text(&self, url: &str) -> Result<String, AppError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::new(4, format!("Benchmark request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Benchmark request failed with status {}.", resp.status()),
            ));
        }

        resp.text()
            .map_err(|e| AppError::new(4, format!("Failed to read benchmark response: {e}")))
    }
}
