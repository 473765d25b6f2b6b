//! Errors reported by [`Buffer`](crate::Buffer) operations.

use std::collections::TryReserveError;
use std::io;

/// The reason a write or reservation failed.
///
/// Every failure leaves the buffer exactly as it was before the call, so the caller is free to
/// retry, release or keep using it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The requested length saturated and can't fit a terminator.
    #[error("requested length does not fit in a buffer")]
    CapacityOverflow,

    /// The allocator could not provide the backing storage.
    #[error("failed to allocate buffer storage")]
    Alloc(#[from] TryReserveError),

    /// A positional write would leave a gap after the current content.
    #[error("write offset {offset} is past the end of the content ({len} bytes)")]
    OffsetGap {
        /// The offset that was requested.
        offset: usize,
        /// The content length at the time of the call.
        len: usize,
    },
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::CapacityOverflow | Error::Alloc(_) => io::ErrorKind::OutOfMemory,
            Error::OffsetGap { .. } => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::CapacityOverflow.to_string(),
            "requested length does not fit in a buffer"
        );
        assert_eq!(
            Error::OffsetGap { offset: 5, len: 3 }.to_string(),
            "write offset 5 is past the end of the content (3 bytes)"
        );
    }

    #[test]
    fn test_error_into_io_error() {
        let err = io::Error::from(Error::CapacityOverflow);
        assert_eq!(err.kind(), io::ErrorKind::OutOfMemory);

        let err = io::Error::from(Error::OffsetGap { offset: 1, len: 0 });
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
