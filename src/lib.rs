//! # dpapi
//!
//! Safe wrapper for the Windows Data Protection API.
//!
//! The operating system does all of the cryptography: key derivation from the
//! user's or machine's secrets, encryption, and integrity binding. This crate only
//! marshals buffers into `DATA_BLOB` structures, makes the call, and copies the
//! OS-allocated result into a `Vec<u8>` before freeing it.
//!
//! ## Key Components
//!
//! - [`Protector`]: round-trips bytes through any [`Boundary`].
//! - [`SystemBoundary`]: the `Crypt32.dll` binding (Windows only).
//! - [`protect`] / [`unprotect`]: shortcuts using a process-wide default protector
//!   (Windows only).
//! - [`encode_utf16_le`]: prepares text the way native Windows code stores it.
//!
//! Calls are non-interactive by default: `CRYPTPROTECT_UI_FORBIDDEN` is set unless
//! [`ProtectorOptions::interactive`] clears it.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! # #[cfg(windows)]
//! # fn main() -> Result<(), dpapi::DpapiError> {
//! let secret = dpapi::encode_utf16_le("MYpasswd");
//!
//! let protected = dpapi::protect(&secret)?;
//! let recovered = dpapi::unprotect(&protected)?;
//! assert_eq!(recovered, secret);
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```

mod blob;
mod boundary;
mod error;
mod protector;
mod types;
mod utf16;

#[cfg(windows)]
pub(crate) mod windows;

// Error type
pub use error::{DpapiError, Result};
// Types
pub use blob::{BlobView, DataBlob, OsBlob};
pub use boundary::Boundary;
pub use protector::{Protector, ProtectorOptions};
pub use types::{Operation, ProtectFlags};
pub use utf16::encode_utf16_le;

#[cfg(windows)]
pub use windows::SystemBoundary;

#[cfg(windows)]
static DEFAULT_PROTECTOR: once_cell::sync::Lazy<Protector<SystemBoundary>> =
    once_cell::sync::Lazy::new(|| Protector::new(SystemBoundary::new()));

/// Returns the process-wide protector used by [`protect`] and [`unprotect`].
#[cfg(windows)]
pub fn default_protector() -> &'static Protector<SystemBoundary> {
    &DEFAULT_PROTECTOR
}

/// Protects `plaintext` for the current user without prompting.
#[cfg(windows)]
pub fn protect(plaintext: &[u8]) -> Result<Vec<u8>> {
    default_protector().protect(plaintext)
}

/// Unprotects data produced by [`protect`] without prompting.
#[cfg(windows)]
pub fn unprotect(ciphertext: &[u8]) -> Result<Vec<u8>> {
    default_protector().unprotect(ciphertext)
}
