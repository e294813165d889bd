// Detection contract constants. Changing any of these changes detection
// outcomes for existing inputs.

/// UTF-8 byte order mark
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// UTF-16 big-endian byte order mark
pub const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];
/// UTF-16 little-endian byte order mark
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Line-ending bytes counted as endianness evidence (`\r`, `\n`)
pub const EOL_BYTES: [u8; 2] = [b'\r', b'\n'];

/// Share of byte pairs that must carry a null in one position
pub const UTF16_NULL_RATIO_POSITIVE: f64 = 0.7;
/// Share of byte pairs the opposite position must stay under
pub const UTF16_NULL_RATIO_NEGATIVE: f64 = 0.1;

/// Tunable thresholds for the UTF-16 null-byte heuristic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Null bytes in the dominant position must exceed this share of pairs
    pub null_ratio_positive: f64,
    /// Null bytes in the other position must stay below this share of pairs
    pub null_ratio_negative: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            null_ratio_positive: UTF16_NULL_RATIO_POSITIVE,
            null_ratio_negative: UTF16_NULL_RATIO_NEGATIVE,
        }
    }
}

impl DetectorConfig {
    /// Positive and negative null-byte thresholds for a buffer of `len` bytes.
    ///
    /// Both are floored; a positive threshold of zero means the buffer is too
    /// small for the ratio test to say anything.
    pub fn null_thresholds(&self, len: usize) -> (usize, usize) {
        let half = (len / 2) as f64;
        let positive = (half * self.null_ratio_positive).floor() as usize;
        let negative = (half * self.null_ratio_negative).floor() as usize;
        (positive, negative)
    }
}
