//! Fake boundary shared by the integration tests.
//!
//! `SealingBoundary` stands in for DPAPI: it masks the payload with a per-call
//! nonce and appends an FNV-1a checksum, so tampered or foreign input is rejected
//! the way the platform rejects it. Every output allocation is tracked so tests can
//! assert release counts and catch double frees.

#![allow(dead_code)]

use dpapi::{Boundary, DataBlob};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

const MAGIC: &[u8; 4] = b"SEAL";
const NONCE_LEN: usize = 8;
const TAG_LEN: usize = 8;
const HEADER_LEN: usize = MAGIC.len() + NONCE_LEN;

/// Win32 ERROR_INVALID_DATA, what CryptUnprotectData reports for bad input.
pub const ERROR_INVALID_DATA: i32 = 13;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fnv1a64(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in data {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn mask(data: &mut [u8], nonce: &[u8]) {
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= nonce[i % nonce.len()] ^ 0x5A;
    }
}

#[derive(Default)]
pub struct SealingBoundary {
    next_nonce: AtomicU64,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    released: AtomicUsize,
    live: Mutex<HashMap<usize, usize>>,
    flags_seen: Mutex<Vec<u32>>,
}

impl SealingBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn live_allocations(&self) -> usize {
        self.live.lock().expect("lock poisoned").len()
    }

    pub fn flags_seen(&self) -> Vec<u32> {
        self.flags_seen.lock().expect("lock poisoned").clone()
    }

    fn read_input(input: &DataBlob) -> Vec<u8> {
        if input.is_null() || input.is_empty() {
            return Vec::new();
        }
        unsafe { std::slice::from_raw_parts(input.pb_data, input.len()) }.to_vec()
    }

    fn hand_out(&self, data: Vec<u8>, output: &mut DataBlob) {
        let len = data.len();
        // One spare byte keeps zero-length outputs at distinct non-null addresses.
        let mut storage = data;
        storage.push(0);
        let ptr = Box::into_raw(storage.into_boxed_slice()).cast::<u8>();
        self.live.lock().expect("lock poisoned").insert(ptr as usize, len + 1);

        *output = DataBlob {
            cb_data: len as u32,
            pb_data: ptr,
        };
        self.succeeded.fetch_add(1, Ordering::SeqCst);
    }

    fn reject(&self) -> io::Error {
        self.failed.fetch_add(1, Ordering::SeqCst);
        io::Error::from_raw_os_error(ERROR_INVALID_DATA)
    }
}

unsafe impl Boundary for SealingBoundary {
    fn protect_raw(&self, input: &DataBlob, flags: u32, output: &mut DataBlob) -> io::Result<()> {
        self.flags_seen.lock().expect("lock poisoned").push(flags);

        let nonce = self.next_nonce.fetch_add(1, Ordering::SeqCst).to_le_bytes();
        let mut body = Self::read_input(input);
        mask(&mut body, &nonce);

        let mut sealed = Vec::with_capacity(HEADER_LEN + body.len() + TAG_LEN);
        sealed.extend_from_slice(MAGIC);
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&body);
        let tag = fnv1a64(&sealed);
        sealed.extend_from_slice(&tag.to_le_bytes());

        self.hand_out(sealed, output);
        Ok(())
    }

    fn unprotect_raw(&self, input: &DataBlob, flags: u32, output: &mut DataBlob) -> io::Result<()> {
        self.flags_seen.lock().expect("lock poisoned").push(flags);

        let sealed = Self::read_input(input);
        if sealed.len() < HEADER_LEN + TAG_LEN || &sealed[..MAGIC.len()] != MAGIC {
            return Err(self.reject());
        }

        let (covered, tag) = sealed.split_at(sealed.len() - TAG_LEN);
        let mut tag_bytes = [0_u8; TAG_LEN];
        tag_bytes.copy_from_slice(tag);
        if fnv1a64(covered) != u64::from_le_bytes(tag_bytes) {
            return Err(self.reject());
        }

        let nonce = &covered[MAGIC.len()..HEADER_LEN];
        let mut body = covered[HEADER_LEN..].to_vec();
        mask(&mut body, nonce);

        self.hand_out(body, output);
        Ok(())
    }

    unsafe fn release(&self, data: *mut u8) {
        let alloc_len = self
            .live
            .lock()
            .expect("lock poisoned")
            .remove(&(data as usize))
            .expect("released a pointer that is not live");
        drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(data, alloc_len)));
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
