use thiserror::Error;

use super::layout;

/// Errors returned by E1.31 decoding.
///
/// # Examples
/// ```
/// use lumenbridge_core::protocols::e131::{E131Error, decode};
///
/// let err = decode(&[0u8; 124]).unwrap_err();
/// assert!(matches!(err, E131Error::InvalidPacketSize { actual: 124, .. }));
/// assert!(err.to_string().contains("invalid packet size"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum E131Error {
    #[error("invalid packet size: need at least {needed} bytes, got {actual}")]
    InvalidPacketSize { needed: usize, actual: usize },
}

impl E131Error {
    pub(crate) fn too_short(actual: usize) -> Self {
        E131Error::InvalidPacketSize {
            needed: layout::HEADER_LEN,
            actual,
        }
    }
}
