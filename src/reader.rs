use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::DetectorConfig;
use crate::detector::{DetectionResult, EncodingDetector};
use crate::encoding::Encoding;

/// Configuration for file reading behavior
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// Memory-map files instead of reading them into a buffer
    pub use_mmap: bool,
    /// Thresholds handed to the detector
    pub detector: DetectorConfig,
}

/// Statistics for a single file detection
#[derive(Debug, Clone)]
pub struct DetectionStats {
    pub file_path: PathBuf,
    pub bytes_read: u64,
    pub encoding: Option<Encoding>,
    pub bom: Option<&'static [u8]>,
    pub duration_us: u64,
    pub error: Option<String>,
}

impl DetectionStats {
    fn new(path: &Path) -> Self {
        Self {
            file_path: path.to_path_buf(),
            bytes_read: 0,
            encoding: None,
            bom: None,
            duration_us: 0,
            error: None,
        }
    }
}

/// Reads files and runs encoding detection on their contents
pub struct FileDetector {
    config: ReaderConfig,
    detector: EncodingDetector,
}

impl FileDetector {
    pub fn new(config: ReaderConfig) -> Self {
        let detector = EncodingDetector::new(config.detector);
        Self { config, detector }
    }

    /// Read `path` and detect its encoding.
    ///
    /// Without `fail_fast`, read and detection failures are returned inside
    /// the stats with no result; with it they become errors.
    pub async fn detect_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<(Option<DetectionResult>, DetectionStats)> {
        let path = path.as_ref();
        let start_time = Instant::now();
        let mut stats = DetectionStats::new(path);

        debug!("Starting detection for file: {}", path.display());

        let outcome = if self.config.use_mmap {
            self.detect_mmap(path).await
        } else {
            self.detect_buffered(path).await
        };

        stats.duration_us = start_time.elapsed().as_micros() as u64;

        match outcome {
            Ok((bytes_read, result)) => {
                stats.bytes_read = bytes_read;
                stats.encoding = Some(result.encoding);
                stats.bom = result.bom_marker;
                info!(
                    path = %path.display(),
                    encoding = %result.encoding,
                    bom = result.bom_marker.is_some(),
                    bytes = bytes_read,
                    "Detected encoding"
                );
                Ok((Some(result), stats))
            }
            Err(e) => {
                let error_msg = format!("{e:#}");
                warn!("Detection failed for {}: {}", path.display(), error_msg);

                if self.config.fail_fast {
                    return Err(e);
                }
                stats.error = Some(error_msg);
                Ok((None, stats))
            }
        }
    }

    async fn detect_buffered(&self, path: &Path) -> Result<(u64, DetectionResult)> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let result = self
            .detector
            .detect_bytes(&bytes)
            .with_context(|| format!("Cannot decode {}", path.display()))?;
        Ok((bytes.len() as u64, result))
    }

    async fn detect_mmap(&self, path: &Path) -> Result<(u64, DetectionResult)> {
        let path = path.to_path_buf();
        let detector = self.detector;

        tokio::task::spawn_blocking(move || -> Result<(u64, DetectionResult)> {
            let file = std::fs::File::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            let len = file.metadata()?.len();

            // mapping an empty file fails on some platforms
            if len == 0 {
                let result = detector.detect_bytes(&[])?;
                return Ok((0, result));
            }

            // SAFETY: the map is read-only and dropped before returning; a
            // concurrent truncation by another process is the caller's risk.
            let mmap = unsafe { memmap2::Mmap::map(&file) }
                .with_context(|| format!("Failed to map {}", path.display()))?;
            let result = detector
                .detect_bytes(&mmap)
                .with_context(|| format!("Cannot decode {}", path.display()))?;
            Ok((len, result))
        })
        .await?
    }

    /// Detect several files one after another
    pub async fn detect_files_batch<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<Vec<(Option<DetectionResult>, DetectionStats)>> {
        info!("Starting batch detection of {} files", paths.len());

        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            results.push(self.detect_file(path).await?);
        }

        let failed = results.iter().filter(|(result, _)| result.is_none()).count();
        info!("Completed batch detection: {} detected, {} failed", results.len() - failed, failed);
        Ok(results)
    }
}

/// Detect a single file with default configuration, failing on any error
pub async fn detect_file_async<P: AsRef<Path>>(path: P) -> Result<DetectionResult> {
    let detector = FileDetector::new(ReaderConfig {
        fail_fast: true,
        ..Default::default()
    });
    let (result, stats) = detector.detect_file(path).await?;
    result.ok_or_else(|| anyhow::anyhow!(stats.error.unwrap_or_else(|| "detection failed".to_string())))
}
