use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::reader::DetectionStats;

/// Per-file detection record as written to the stats file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FileStats {
    /// File path as discovered
    pub path: String,
    pub bytes_read: u64,
    /// Encoding name, absent when detection failed
    pub encoding: Option<String>,
    /// BOM bytes as uppercase hex, e.g. "EFBBBF"
    pub bom: Option<String>,
    pub detection_time_us: u64,
    /// "detected" or "failed"
    pub status: String,
    pub error: Option<String>,
}

impl From<&DetectionStats> for FileStats {
    fn from(stats: &DetectionStats) -> Self {
        Self {
            path: stats.file_path.display().to_string(),
            bytes_read: stats.bytes_read,
            encoding: stats.encoding.map(|e| e.name().to_string()),
            bom: stats.bom.map(hex),
            detection_time_us: stats.duration_us,
            status: if stats.encoding.is_some() { "detected" } else { "failed" }.to_string(),
            error: stats.error.clone(),
        }
    }
}

/// Summary of one run over a set of files
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub files: Vec<FileStats>,
    /// Count of files per encoding name, plus "failed"
    pub totals: BTreeMap<String, u64>,
}

impl RunStats {
    pub fn push(&mut self, file: FileStats) {
        let key = file.encoding.clone().unwrap_or_else(|| "failed".to_string());
        *self.totals.entry(key).or_default() += 1;
        self.files.push(file);
    }

    pub fn failed(&self) -> u64 {
        self.totals.get("failed").copied().unwrap_or(0)
    }

    /// Write the stats as pretty JSON to `path`
    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let file = tokio::fs::File::create(path).await?;
        let mut writer = BufWriter::new(file);

        let json = serde_json::to_vec_pretty(self)?;
        writer.write_all(&json).await?;
        writer.write_all(b"\n").await?;

        writer.flush().await?;
        Ok(())
    }
}

/// Uppercase hex rendering of a byte sequence
pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}
