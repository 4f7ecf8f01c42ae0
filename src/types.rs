use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Option flags passed as `dwFlags` to the protect and unprotect calls.
///
/// Values match the `CRYPTPROTECT_*` constants from `dpapi.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct ProtectFlags(u32);

impl ProtectFlags {
    /// Never raise a user-interface prompt. Calls that would need one fail instead.
    pub const UI_FORBIDDEN: Self = Self(0x1);

    /// Bind protected data to the machine rather than the current user.
    ///
    /// Only meaningful for protect; unprotect ignores it.
    pub const LOCAL_MACHINE: Self = Self(0x4);

    /// No flags set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Wraps raw flag bits, keeping bits this crate has no name for.
    pub const fn from_bits_retain(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw `dwFlags` value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for ProtectFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ProtectFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<ProtectFlags> for u32 {
    fn from(flags: ProtectFlags) -> u32 {
        flags.0
    }
}

/// The two boundary calls this crate makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `CryptProtectData`
    Protect,
    /// `CryptUnprotectData`
    Unprotect,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Protect => f.write_str("CryptProtectData"),
            Operation::Unprotect => f.write_str("CryptUnprotectData"),
        }
    }
}
