use crate::blob::DataBlob;
use std::io;

/// The external protect/unprotect surface.
///
/// [`SystemBoundary`](crate::SystemBoundary) binds this to `Crypt32.dll` on
/// Windows. Any other implementation (a fake in tests, an instrumented wrapper)
/// can be handed to [`Protector::new`](crate::Protector::new) instead.
///
/// # Safety
///
/// Implementors must uphold the ownership contract the [`Protector`](crate::Protector)
/// relies on:
///
/// - On `Ok(())`, `output.pb_data` is null or points to `output.cb_data` bytes
///   that are readable and writable until passed to [`release`](Boundary::release).
/// - On `Err(_)`, `output` is left untouched and nothing needs releasing.
/// - `input` is only read, never written or retained past the call.
pub unsafe trait Boundary: Send + Sync {
    /// Protects `input`, writing the OS-allocated result into `output`.
    fn protect_raw(&self, input: &DataBlob, flags: u32, output: &mut DataBlob) -> io::Result<()>;

    /// Unprotects `input`, writing the OS-allocated result into `output`.
    fn unprotect_raw(&self, input: &DataBlob, flags: u32, output: &mut DataBlob) -> io::Result<()>;

    /// Hands an output buffer back to the allocator it came from.
    ///
    /// # Safety
    ///
    /// `data` must be the non-null `pb_data` of an output blob produced by this
    /// boundary, and must not have been released before.
    unsafe fn release(&self, data: *mut u8);
}

unsafe impl<B: Boundary + ?Sized> Boundary for &B {
    fn protect_raw(&self, input: &DataBlob, flags: u32, output: &mut DataBlob) -> io::Result<()> {
        (**self).protect_raw(input, flags, output)
    }

    fn unprotect_raw(&self, input: &DataBlob, flags: u32, output: &mut DataBlob) -> io::Result<()> {
        (**self).unprotect_raw(input, flags, output)
    }

    unsafe fn release(&self, data: *mut u8) {
        (**self).release(data)
    }
}

unsafe impl<B: Boundary + ?Sized> Boundary for std::sync::Arc<B> {
    fn protect_raw(&self, input: &DataBlob, flags: u32, output: &mut DataBlob) -> io::Result<()> {
        (**self).protect_raw(input, flags, output)
    }

    fn unprotect_raw(&self, input: &DataBlob, flags: u32, output: &mut DataBlob) -> io::Result<()> {
        (**self).unprotect_raw(input, flags, output)
    }

    unsafe fn release(&self, data: *mut u8) {
        (**self).release(data)
    }
}
