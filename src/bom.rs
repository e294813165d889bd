use std::io;

use crate::config::{UTF16_BE_BOM, UTF16_LE_BOM, UTF8_BOM};
use crate::encoding::Encoding;
use crate::source::ByteSource;

/// Outcome of probing the head of a source for a byte order mark
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BomProbe {
    Found {
        encoding: Encoding,
        marker: &'static [u8],
    },
    /// No BOM. Holds every byte consumed while probing (at most 3) so the
    /// caller can put them back in front of the content.
    NotFound(Vec<u8>),
}

/// Match the start of `bytes` against the known BOMs.
///
/// The two-byte UTF-16 marks are checked before the three-byte UTF-8 mark.
pub fn match_bom(bytes: &[u8]) -> Option<(Encoding, &'static [u8])> {
    if bytes.starts_with(&UTF16_BE_BOM) {
        return Some((Encoding::Utf16Be, &UTF16_BE_BOM));
    }
    if bytes.starts_with(&UTF16_LE_BOM) {
        return Some((Encoding::Utf16Le, &UTF16_LE_BOM));
    }
    if bytes.starts_with(&UTF8_BOM) {
        return Some((Encoding::Utf8, &UTF8_BOM));
    }
    None
}

/// Read the first 2 bytes, and a third if needed, looking for a BOM.
///
/// Input shorter than a BOM is reported as `NotFound`, never as an error.
pub fn probe_bom<S: ByteSource + ?Sized>(source: &mut S) -> io::Result<BomProbe> {
    let mut probe = source.read_up_to(UTF16_BE_BOM.len())?;
    if probe.len() == UTF16_BE_BOM.len() {
        if let Some((encoding, marker)) = match_bom(&probe) {
            return Ok(BomProbe::Found { encoding, marker });
        }

        probe.extend(source.read_up_to(UTF8_BOM.len() - probe.len())?);
        if probe[..] == UTF8_BOM {
            return Ok(BomProbe::Found {
                encoding: Encoding::Utf8,
                marker: &UTF8_BOM,
            });
        }
    }

    Ok(BomProbe::NotFound(probe))
}
