use tracing::debug;

use crate::bom::{probe_bom, BomProbe};
use crate::config::DetectorConfig;
use crate::encoding::Encoding;
use crate::error::DetectError;
use crate::source::ByteSource;
use crate::utf16::detect_utf16;
use crate::utf8::validate_utf8;

/// A successful detection: the encoding, the BOM it was found by (if any),
/// and the decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    pub encoding: Encoding,
    /// Set only when the encoding came from a byte order mark
    pub bom_marker: Option<&'static [u8]>,
    pub decoded_text: String,
}

impl DetectionResult {
    /// Re-encode the text in the detected encoding, BOM included.
    ///
    /// For any result returned by detection this reproduces the input bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.bom_marker.map(<[u8]>::to_vec).unwrap_or_default();
        bytes.extend(self.encoding.encode(&self.decoded_text));
        bytes
    }
}

/// Runs BOM detection, ASCII/UTF-8 validation and the UTF-16 heuristic in
/// that order. Holds no state between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodingDetector {
    config: DetectorConfig,
}

impl EncodingDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Detect and decode everything `source` yields.
    pub fn detect<S: ByteSource + ?Sized>(&self, source: &mut S) -> Result<DetectionResult, DetectError> {
        let mut buffer = match probe_bom(source)? {
            BomProbe::Found { encoding, marker } => {
                debug!(%encoding, "Byte order mark found");
                let mut rest = Vec::new();
                source.read_remaining(&mut rest)?;
                return decode(encoding, Some(marker), &rest);
            }
            BomProbe::NotFound(probe) => probe,
        };
        source.read_remaining(&mut buffer)?;

        if let Some(encoding) = validate_utf8(&buffer) {
            debug!(%encoding, len = buffer.len(), "Content validated as ASCII/UTF-8");
            return decode(encoding, None, &buffer);
        }

        match detect_utf16(&buffer, &self.config) {
            Ok(encoding) => {
                debug!(%encoding, len = buffer.len(), "Content inferred as UTF-16");
                decode(encoding, None, &buffer)
            }
            Err(reason) => {
                debug!(?reason, len = buffer.len(), "No encoding could be determined");
                Err(DetectError::AmbiguousEncoding)
            }
        }
    }

    /// Detect and decode an in-memory buffer.
    pub fn detect_bytes(&self, mut bytes: &[u8]) -> Result<DetectionResult, DetectError> {
        self.detect(&mut bytes)
    }
}

fn decode(
    encoding: Encoding,
    bom_marker: Option<&'static [u8]>,
    content: &[u8],
) -> Result<DetectionResult, DetectError> {
    let decoded_text = encoding.decode(content).ok_or_else(|| {
        debug!(%encoding, "Content failed to decode");
        DetectError::MalformedSequence { encoding }
    })?;

    Ok(DetectionResult {
        encoding,
        bom_marker,
        decoded_text,
    })
}

/// Detect with the default thresholds.
pub fn detect<S: ByteSource + ?Sized>(source: &mut S) -> Result<DetectionResult, DetectError> {
    EncodingDetector::default().detect(source)
}

/// Detect an in-memory buffer with the default thresholds.
pub fn detect_bytes(bytes: &[u8]) -> Result<DetectionResult, DetectError> {
    EncodingDetector::default().detect_bytes(bytes)
}
