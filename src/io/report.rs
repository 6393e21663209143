//! Read/write report JSON files.
//!
//! Report JSON is the "portable" representation of a run:
//! - observations and fitted power-law parameters
//! - monetization inputs and projection results
//! - the fitted curve for quick plotting
//!
//! The schema is defined by `report::LtvReport`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::AppError;
use crate::report::LtvReport;

/// Write a report JSON file.
pub fn write_report_json(path: &Path, report: &LtvReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush report JSON '{}': {e}", path.display())))?;

    debug!(path = %path.display(), "wrote report JSON");
    Ok(())
}

/// Read a report JSON file.
pub fn read_report_json(path: &Path) -> Result<LtvReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: LtvReport =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid report JSON: {e}")))?;
    Ok(report)
}
