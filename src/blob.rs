//! Transport structures passed across the boundary.
//!
//! A [`DataBlob`] is the length-prefixed pointer pair the platform calls take and
//! return. It shows up in two ownership regimes:
//!
//! - [`BlobView`] borrows a caller-owned slice. It never copies or frees.
//! - [`OsBlob`] wraps output allocated by the boundary. It copies the bytes out
//!   and hands the allocation back to the boundary exactly once, on drop.

use crate::boundary::Boundary;
use crate::error::{DpapiError, Result};
use std::marker::PhantomData;
use std::{fmt, ptr, slice};
use zeroize::Zeroize;

/// Layout-compatible with the Win32 `DATA_BLOB` (`CRYPT_INTEGER_BLOB`) structure.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DataBlob {
    /// Number of bytes at `pb_data`.
    pub cb_data: u32,
    /// First byte of the buffer, or null when `cb_data` is zero.
    pub pb_data: *mut u8,
}

impl DataBlob {
    /// A blob with no data, used as the out-parameter of boundary calls.
    pub const fn null() -> Self {
        Self {
            cb_data: 0,
            pb_data: ptr::null_mut(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.pb_data.is_null()
    }

    pub fn len(&self) -> usize {
        self.cb_data as usize
    }

    pub fn is_empty(&self) -> bool {
        self.cb_data == 0
    }
}

impl Default for DataBlob {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for DataBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataBlob")
            .field("cb_data", &self.cb_data)
            .field("pb_data", &self.pb_data)
            .finish()
    }
}

/// Converts a buffer length to the 32-bit `cbData` field.
fn blob_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| DpapiError::InputTooLarge(len))
}

/// A [`DataBlob`] borrowing a caller-owned slice.
///
/// The lifetime ties the view to its source, so it cannot outlive the bytes it
/// points at.
#[derive(Debug)]
pub struct BlobView<'a> {
    blob: DataBlob,
    _source: PhantomData<&'a [u8]>,
}

impl<'a> BlobView<'a> {
    /// Builds a view over `data`.
    ///
    /// An empty slice maps to a null pointer with zero length.
    ///
    /// # Errors
    ///
    /// Returns `DpapiError::InputTooLarge` if `data` is longer than `u32::MAX` bytes.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self {
                blob: DataBlob::null(),
                _source: PhantomData,
            });
        }

        let cb_data = blob_len(data.len())?;

        // The platform declares pbData as mutable but never writes through an input blob.
        Ok(Self {
            blob: DataBlob {
                cb_data,
                pb_data: data.as_ptr().cast_mut(),
            },
            _source: PhantomData,
        })
    }

    pub fn as_raw(&self) -> &DataBlob {
        &self.blob
    }

    pub fn len(&self) -> usize {
        self.blob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blob.is_empty()
    }
}

/// Output memory owned by a [`Boundary`] allocator.
///
/// Dropping an `OsBlob` releases the allocation through [`Boundary::release`].
/// The release runs on every path out of the scope that holds it, panics during
/// the copy included.
pub struct OsBlob<'b, B: Boundary + ?Sized> {
    blob: DataBlob,
    boundary: &'b B,
    wipe_on_release: bool,
}

impl<'b, B: Boundary + ?Sized> OsBlob<'b, B> {
    /// Takes ownership of a blob populated by `boundary`.
    ///
    /// When `wipe_on_release` is set, the buffer is zeroed before it goes back to
    /// the allocator.
    ///
    /// # Safety
    ///
    /// - `blob` must come from a call on `boundary` that reported success.
    /// - `blob.pb_data` must be null or point to `blob.cb_data` bytes that stay
    ///   valid and writable until released.
    /// - Nothing else may release `blob.pb_data`.
    pub unsafe fn from_raw(blob: DataBlob, boundary: &'b B, wipe_on_release: bool) -> Self {
        Self {
            blob,
            boundary,
            wipe_on_release,
        }
    }

    pub fn len(&self) -> usize {
        self.blob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blob.is_empty() || self.blob.is_null()
    }

    /// Borrows the OS buffer.
    pub fn as_slice(&self) -> &[u8] {
        if self.is_empty() {
            return &[];
        }
        // SAFETY: from_raw guarantees pb_data points to cb_data live bytes
        unsafe { slice::from_raw_parts(self.blob.pb_data, self.blob.len()) }
    }

    /// Copies the buffer into caller-owned memory.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }
}

impl<B: Boundary + ?Sized> Drop for OsBlob<'_, B> {
    fn drop(&mut self) {
        if self.blob.is_null() {
            return;
        }

        if self.wipe_on_release && !self.blob.is_empty() {
            // SAFETY: the buffer is live and writable until released below
            unsafe { slice::from_raw_parts_mut(self.blob.pb_data, self.blob.len()) }.zeroize();
        }

        // SAFETY: from_raw guarantees this is the only release of pb_data
        unsafe { self.boundary.release(self.blob.pb_data) };
        self.blob = DataBlob::null();
    }
}

impl<B: Boundary + ?Sized> fmt::Debug for OsBlob<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsBlob")
            .field("blob", &self.blob)
            .field("wipe_on_release", &self.wipe_on_release)
            .finish_non_exhaustive()
    }
}
