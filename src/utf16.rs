use tracing::debug;

use crate::config::{DetectorConfig, EOL_BYTES};
use crate::encoding::Encoding;

/// Why the UTF-16 heuristic declined to give a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undetermined {
    /// Too few byte pairs for the null-ratio thresholds to mean anything
    InsufficientData,
    /// Enough data, but neither byte order is clearly favoured
    Ambiguous,
}

/// Null-byte and line-ending counts over consecutive byte pairs.
///
/// In each pair the first byte is the "odd" position and the second the
/// "even" position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairStats {
    pub null_byte_odd: usize,
    pub null_byte_even: usize,
    pub eol_odd: usize,
    pub eol_even: usize,
}

/// Count null bytes and line endings per pair position.
///
/// A trailing unpaired byte is ignored. A pair with a null in the odd
/// position is never counted for the even position.
pub fn pair_stats(bytes: &[u8]) -> PairStats {
    let mut stats = PairStats::default();

    for pair in bytes.chunks_exact(2) {
        let (odd, even) = (pair[0], pair[1]);
        if odd == 0 {
            stats.null_byte_odd += 1;
            if EOL_BYTES.contains(&even) {
                stats.eol_even += 1;
            }
        } else if even == 0 {
            stats.null_byte_even += 1;
            if EOL_BYTES.contains(&odd) {
                stats.eol_odd += 1;
            }
        }
    }

    stats
}

/// Infer UTF-16 byte order from content alone.
///
/// Line-ending evidence wins whenever it points only one way. Otherwise the
/// share of nulls in each pair position decides, provided the buffer is
/// large enough for the thresholds in `config`.
pub fn detect_utf16(bytes: &[u8], config: &DetectorConfig) -> Result<Encoding, Undetermined> {
    let stats = pair_stats(bytes);
    debug!(?stats, len = bytes.len(), "UTF-16 pair statistics");

    // ASCII line endings sit in the low byte: second in BE, first in LE
    match (stats.eol_odd, stats.eol_even) {
        (0, even) if even > 0 => return Ok(Encoding::Utf16Be),
        (odd, 0) if odd > 0 => return Ok(Encoding::Utf16Le),
        _ => {}
    }

    let (positive, negative) = config.null_thresholds(bytes.len());
    if positive == 0 {
        return Err(Undetermined::InsufficientData);
    }

    if stats.null_byte_odd > positive && stats.null_byte_even < negative {
        return Ok(Encoding::Utf16Be);
    }
    if stats.null_byte_odd < negative && stats.null_byte_even > positive {
        return Ok(Encoding::Utf16Le);
    }

    Err(Undetermined::Ambiguous)
}
