//! Export the day-indexed LTV table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::AppError;

/// Write `day,ltv_usd` rows.
pub fn write_day_ltv_csv(path: &Path, day_ltv: &BTreeMap<u32, f64>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut file = BufWriter::new(file);

    writeln!(file, "day,ltv_usd")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (day, ltv) in day_ltv {
        writeln!(file, "{day},{ltv:.2}")
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    file.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;

    debug!(path = %path.display(), rows = day_ltv.len(), "wrote day LTV CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let mut table = BTreeMap::new();
        table.insert(0, 0.5);
        table.insert(1, 0.65);
        table.insert(2, 0.756);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ltv.csv");
        write_day_ltv_csv(&path, &table).unwrap();

        let txt = std::fs::read_to_string(&path).unwrap();
        assert_eq!(txt, "day,ltv_usd\n0,0.50\n1,0.65\n2,0.76\n");
    }
}
