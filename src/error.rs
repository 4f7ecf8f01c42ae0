use crate::types::Operation;
use thiserror::Error;

/// Result type for dpapi operations
pub type Result<T> = std::result::Result<T, DpapiError>;

/// Errors that can occur while protecting or unprotecting data.
#[derive(Error, Debug)]
pub enum DpapiError {
    /// The platform protect/unprotect call reported failure.
    ///
    /// Carries the last-error value captured right after the call. Malformed,
    /// tampered, or foreign ciphertext is reported through this variant as well;
    /// the platform does not distinguish those cases from any other failure.
    #[error("{operation} call failed: {source}")]
    BoundaryCallFailed {
        /// Which boundary call failed.
        operation: Operation,
        /// The platform error.
        #[source]
        source: std::io::Error,
    },

    /// The input does not fit the 32-bit length field of a data blob.
    #[error("Input of {0} bytes exceeds the maximum blob length")]
    InputTooLarge(usize),
}

impl DpapiError {
    /// Returns the raw OS error code of a failed boundary call, if there is one.
    pub fn code(&self) -> Option<i32> {
        match self {
            DpapiError::BoundaryCallFailed { source, .. } => source.raw_os_error(),
            DpapiError::InputTooLarge(_) => None,
        }
    }

    /// Returns `true` if this error came back from the platform call.
    pub fn is_boundary_failure(&self) -> bool {
        matches!(self, DpapiError::BoundaryCallFailed { .. })
    }
}
