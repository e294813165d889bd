use thiserror::Error;

use crate::encoding::Encoding;

/// Why a detection call produced no result
#[derive(Debug, Error)]
pub enum DetectError {
    /// No BOM, not ASCII/UTF-8, and no confident UTF-16 verdict
    #[error("unable to determine encoding")]
    AmbiguousEncoding,

    /// The bytes were attributed to an encoding but do not decode under it
    #[error("content is not valid {encoding}")]
    MalformedSequence { encoding: Encoding },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
