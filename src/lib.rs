pub mod bom;
pub mod config;
pub mod detector;
pub mod discovery;
pub mod encoding;
pub mod error;
pub mod reader;
pub mod report;
pub mod source;
pub mod utf16;
pub mod utf8;

// Re-export the detection entry points and result types
pub use config::{
    DetectorConfig, EOL_BYTES, UTF16_BE_BOM, UTF16_LE_BOM, UTF16_NULL_RATIO_NEGATIVE,
    UTF16_NULL_RATIO_POSITIVE, UTF8_BOM,
};
pub use detector::{detect, detect_bytes, DetectionResult, EncodingDetector};
pub use encoding::Encoding;
pub use error::DetectError;
pub use source::ByteSource;

// Re-export file-level helpers used by the CLI and benchmarks
pub use discovery::{DiscoveryConfig, FileValidation};
pub use reader::{detect_file_async, DetectionStats, FileDetector, ReaderConfig};
pub use report::{FileStats, RunStats};
