use crate::encoding::Encoding;

/// Structurally validate `bytes` as UTF-8.
///
/// Returns `Ascii` when no multi-byte character appears, `Utf8` when at
/// least one does, and `None` for anything else. Only leading-byte ranges
/// and sequence lengths are checked: surrogate code points and overlong
/// three/four byte forms (`E0 80..9F`, `F0 80..8F`, `F4 90..`) still pass.
/// The strict decode that follows detection rejects those.
///
/// `0x00` is not accepted as text, which keeps UTF-16 content from ever
/// validating here.
pub fn validate_utf8(bytes: &[u8]) -> Option<Encoding> {
    let mut ascii_only = true;
    let mut byte_follow = 0u8;

    for &byte in bytes {
        if byte_follow > 0 {
            if !(0x80..=0xBF).contains(&byte) {
                return None;
            }
            byte_follow -= 1;
            ascii_only = false;
            continue;
        }

        byte_follow = match byte {
            0x01..=0x7F => 0,
            0xC2..=0xDF => 1,
            0xE0..=0xEF => 2,
            0xF0..=0xF4 => 3,
            _ => return None,
        };
    }

    // ended partway through a character
    if byte_follow != 0 {
        return None;
    }

    Some(if ascii_only { Encoding::Ascii } else { Encoding::Utf8 })
}
