use crate::blob::DataBlob;
use crate::boundary::Boundary;
use log::debug;
use std::{io, ptr};
use windows_sys::Win32::Foundation::LocalFree;
use windows_sys::Win32::Security::Cryptography::{
    CryptProtectData, CryptUnprotectData, CRYPT_INTEGER_BLOB,
};

/// [`Boundary`] backed by `CryptProtectData`, `CryptUnprotectData` and `LocalFree`.
///
/// Description, optional entropy, reserved and prompt-struct arguments are always
/// null. Output buffers are allocated by the LSA and freed with `LocalFree`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBoundary;

impl SystemBoundary {
    pub const fn new() -> Self {
        Self
    }
}

#[inline]
fn to_crypt_blob(blob: &DataBlob) -> CRYPT_INTEGER_BLOB {
    CRYPT_INTEGER_BLOB {
        cbData: blob.cb_data,
        pbData: blob.pb_data,
    }
}

#[inline]
fn from_crypt_blob(blob: &CRYPT_INTEGER_BLOB) -> DataBlob {
    DataBlob {
        cb_data: blob.cbData,
        pb_data: blob.pbData,
    }
}

#[inline]
fn empty_crypt_blob() -> CRYPT_INTEGER_BLOB {
    CRYPT_INTEGER_BLOB {
        cbData: 0,
        pbData: ptr::null_mut(),
    }
}

unsafe impl Boundary for SystemBoundary {
    fn protect_raw(&self, input: &DataBlob, flags: u32, output: &mut DataBlob) -> io::Result<()> {
        let data_in = to_crypt_blob(input);
        let mut data_out = empty_crypt_blob();

        // SAFETY: data_in borrows memory the caller keeps alive for the call; all
        // optional arguments are null
        let ok = unsafe {
            CryptProtectData(
                &data_in,
                ptr::null(),
                ptr::null(),
                ptr::null(),
                ptr::null(),
                flags,
                &mut data_out,
            )
        };

        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        *output = from_crypt_blob(&data_out);
        Ok(())
    }

    fn unprotect_raw(&self, input: &DataBlob, flags: u32, output: &mut DataBlob) -> io::Result<()> {
        let data_in = to_crypt_blob(input);
        let mut data_out = empty_crypt_blob();

        // SAFETY: as in protect_raw; the description out-parameter is null so the
        // OS allocates nothing besides data_out
        let ok = unsafe {
            CryptUnprotectData(
                &data_in,
                ptr::null_mut(),
                ptr::null(),
                ptr::null(),
                ptr::null(),
                flags,
                &mut data_out,
            )
        };

        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        *output = from_crypt_blob(&data_out);
        Ok(())
    }

    unsafe fn release(&self, data: *mut u8) {
        // LocalFree returns the handle back when it fails.
        let remaining = LocalFree(data.cast());
        if !remaining.is_null() {
            debug!(
                "LocalFree failed for {:p}: {}",
                data,
                io::Error::last_os_error()
            );
        }
    }
}
