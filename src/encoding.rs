use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{UTF16_BE_BOM, UTF16_LE_BOM, UTF8_BOM};

/// The encodings this crate can report. No other value is ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "ascii")]
    Ascii,
    #[serde(rename = "utf_8")]
    Utf8,
    #[serde(rename = "utf_16_be")]
    Utf16Be,
    #[serde(rename = "utf_16_le")]
    Utf16Le,
}

impl Encoding {
    pub const ALL: [Encoding; 4] = [
        Encoding::Ascii,
        Encoding::Utf8,
        Encoding::Utf16Be,
        Encoding::Utf16Le,
    ];

    /// Stable lowercase name used in logs, CLI output and stats
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Ascii => "ascii",
            Encoding::Utf8 => "utf_8",
            Encoding::Utf16Be => "utf_16_be",
            Encoding::Utf16Le => "utf_16_le",
        }
    }

    /// Byte order mark for this encoding, if it has one
    pub fn bom(self) -> Option<&'static [u8]> {
        match self {
            Encoding::Ascii => None,
            Encoding::Utf8 => Some(&UTF8_BOM),
            Encoding::Utf16Be => Some(&UTF16_BE_BOM),
            Encoding::Utf16Le => Some(&UTF16_LE_BOM),
        }
    }

    /// Strictly decode `bytes` under this encoding.
    ///
    /// Returns `None` on any malformed input instead of substituting
    /// replacement characters. A BOM is not stripped here; callers pass the
    /// bytes that follow it.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        let codec = match self {
            Encoding::Ascii => {
                if !bytes.is_ascii() {
                    return None;
                }
                encoding_rs::UTF_8
            }
            Encoding::Utf8 => encoding_rs::UTF_8,
            Encoding::Utf16Be => encoding_rs::UTF_16BE,
            Encoding::Utf16Le => encoding_rs::UTF_16LE,
        };

        codec
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
    }

    /// Encode `text` under this encoding, without a BOM.
    ///
    /// `Ascii` passes bytes through unchanged; it is only ever paired with
    /// text that was decoded from ASCII input.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Ascii | Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Encoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
