use crate::core::histogram::Histogram2D;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct BinRecord {
    x_low: f64,
    x_high: f64,
    y_low: f64,
    y_high: f64,
    content: f64,
}

/// Writes one CSV row per bin: `x_low,x_high,y_low,y_high,content`.
pub fn write_histogram_csv<W: Write>(hist: &Histogram2D, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (ix, iy, content) in hist.iter_bins() {
        let ((x_low, x_high), (y_low, y_high)) = hist.bin_edges(ix, iy);
        csv_writer.serialize(BinRecord {
            x_low,
            x_high,
            y_low,
            y_high,
            content,
        })?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_histogram_csv_to_path(hist: &Histogram2D, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_histogram_csv(hist, file)
}
