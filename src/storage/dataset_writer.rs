use std::fs;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use tracing::info;

/// Writes the final table under a dated output directory.
pub struct DatasetWriter {
    out_dir: PathBuf,
}

impl DatasetWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        DatasetWriter {
            out_dir: out_dir.into(),
        }
    }

    /// CSV is the flat delimited deliverable for downstream analysis.
    pub fn write_csv(&self, df: &mut DataFrame) -> Result<PathBuf> {
        let path = self.dated_path("listings.csv")?;
        let mut file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        CsvWriter::new(&mut file).include_header(true).finish(df)?;

        info!("Wrote {} rows to {}", df.height(), path.display());
        Ok(path)
    }

    pub fn write_parquet(&self, df: &mut DataFrame) -> Result<PathBuf> {
        let path = self.dated_path("listings.parquet")?;
        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        ParquetWriter::new(file).finish(df)?;

        info!("Wrote {} rows to {}", df.height(), path.display());
        Ok(path)
    }

    fn dated_path(&self, file_name: &str) -> Result<PathBuf> {
        let date = Utc::now().format("%Y/%m/%d").to_string();
        let dir = self.out_dir.join(date);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        Ok(dir.join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_writes_csv_with_header() {
        let out_dir = std::env::temp_dir().join(format!("dataset-writer-{}", Uuid::new_v4()));
        let writer = DatasetWriter::new(&out_dir);

        let mut df = DataFrame::new(vec![
            Series::new("price".into(), vec![Some(450000.0), None]).into(),
            Series::new("beds".into(), vec![Some(3.0), Some(2.0)]).into(),
        ])
        .unwrap();

        let path = writer.write_csv(&mut df).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("price,beds"));
        assert_eq!(written.lines().count(), 3);

        fs::remove_dir_all(&out_dir).unwrap();
    }
}
