use crate::blob::{BlobView, DataBlob, OsBlob};
use crate::boundary::Boundary;
use crate::error::{DpapiError, Result};
use crate::types::{Operation, ProtectFlags};
use log::{debug, trace};

/// Settings applied to every call a [`Protector`] makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectorOptions {
    flags: ProtectFlags,
}

impl ProtectorOptions {
    /// Options with `flags` passed verbatim to both calls.
    pub fn with_flags(flags: ProtectFlags) -> Self {
        Self { flags }
    }

    /// Allows the platform to prompt the user.
    pub fn interactive(mut self) -> Self {
        self.flags.remove(ProtectFlags::UI_FORBIDDEN);
        self
    }

    /// Binds protected data to the machine instead of the current user.
    pub fn local_machine(mut self) -> Self {
        self.flags.insert(ProtectFlags::LOCAL_MACHINE);
        self
    }

    pub fn flags(&self) -> ProtectFlags {
        self.flags
    }
}

impl Default for ProtectorOptions {
    /// Non-interactive: `UI_FORBIDDEN` is always set unless explicitly cleared.
    fn default() -> Self {
        Self {
            flags: ProtectFlags::UI_FORBIDDEN,
        }
    }
}

/// Round-trips byte buffers through a [`Boundary`].
///
/// A `Protector` holds no mutable state and may be shared freely between
/// threads when its boundary allows it.
#[derive(Debug, Clone)]
pub struct Protector<B> {
    boundary: B,
    options: ProtectorOptions,
}

impl<B: Boundary> Protector<B> {
    /// Creates a protector with default (non-interactive) options.
    pub fn new(boundary: B) -> Self {
        Self::with_options(boundary, ProtectorOptions::default())
    }

    pub fn with_options(boundary: B, options: ProtectorOptions) -> Self {
        Self { boundary, options }
    }

    pub fn options(&self) -> &ProtectorOptions {
        &self.options
    }

    pub fn boundary(&self) -> &B {
        &self.boundary
    }

    /// Protects `plaintext` and returns the platform's opaque output.
    ///
    /// # Errors
    ///
    /// Returns `DpapiError::BoundaryCallFailed` if the platform call fails, or
    /// `DpapiError::InputTooLarge` if `plaintext` does not fit a data blob.
    pub fn protect(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.call(Operation::Protect, plaintext)
    }

    /// Reverses [`protect`](Self::protect).
    ///
    /// # Errors
    ///
    /// Returns `DpapiError::BoundaryCallFailed` if the platform call fails. Input
    /// that was not produced by the platform, or was modified after, fails this way.
    /// Returns `DpapiError::InputTooLarge` if `ciphertext` does not fit a data blob.
    pub fn unprotect(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.call(Operation::Unprotect, ciphertext)
    }

    fn call(&self, operation: Operation, input: &[u8]) -> Result<Vec<u8>> {
        let view = BlobView::new(input)?;
        let flags = self.options.flags.bits();
        let mut raw = DataBlob::null();

        trace!("{} in={} flags={:#x}", operation, view.len(), flags);

        let status = match operation {
            Operation::Protect => self.boundary.protect_raw(view.as_raw(), flags, &mut raw),
            Operation::Unprotect => self.boundary.unprotect_raw(view.as_raw(), flags, &mut raw),
        };

        if let Err(source) = status {
            debug!("{} failed for {} byte input: {}", operation, view.len(), source);
            return Err(DpapiError::BoundaryCallFailed { operation, source });
        }

        // Unprotect output is plaintext; zero the OS copy before it is freed.
        let wipe = operation == Operation::Unprotect;

        // SAFETY: the boundary reported success, so raw is ours to release once
        let output = unsafe { OsBlob::from_raw(raw, &self.boundary, wipe) };
        trace!("{} out={}", operation, output.len());

        Ok(output.to_vec())
    }
}
