//! Inline strings for parameter keys and derived OSC addresses
//!
//! Avatar parameter keys and the addresses derived from them are short,
//! fixed at configuration time, and used as routing-table keys on every
//! inbound message. Storing them inline keeps the routing table heap-free
//! and `Copy`, which matters for the no_std build.
//!
//! The buffer past `len` is always zero-filled, so the derived `Eq` and
//! `Hash` impls agree with string equality.

use core::fmt;
use core::ops::Deref;

/// Maximum length of an avatar parameter key, in bytes
pub const MAX_KEY_LEN: usize = 31;

/// Maximum length of a derived OSC address, in bytes
pub const MAX_ADDR_LEN: usize = 63;

/// Fixed-capacity inline string
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InlineStr<const N: usize> {
    len: u8,
    data: [u8; N],
}

/// An avatar parameter key, e.g. `HapticsVelocity_1`
pub type ParamKey = InlineStr<MAX_KEY_LEN>;

/// A full OSC address pattern, e.g. `/avatar/parameters/HapticsVelocity_1`
pub type OscAddress = InlineStr<MAX_ADDR_LEN>;

impl<const N: usize> InlineStr<N> {
    /// Create from a string slice; `None` if it exceeds the capacity
    pub fn new(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() > N {
            return None;
        }

        let mut data = [0u8; N];
        data[..bytes.len()].copy_from_slice(bytes);
        Some(Self {
            len: bytes.len() as u8,
            data,
        })
    }

    /// View as a string slice
    pub fn as_str(&self) -> &str {
        // Only constructed from &str, so the prefix is valid UTF-8
        core::str::from_utf8(&self.data[..self.len as usize]).unwrap_or("")
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the string is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Concatenate `prefix` and `suffix`; `None` if the result would overflow
    pub(crate) fn concat(prefix: &str, suffix: &str) -> Option<Self> {
        let (p, s) = (prefix.as_bytes(), suffix.as_bytes());
        let total = p.len() + s.len();
        if total > N {
            return None;
        }

        let mut data = [0u8; N];
        data[..p.len()].copy_from_slice(p);
        data[p.len()..total].copy_from_slice(s);
        Some(Self {
            len: total as u8,
            data,
        })
    }
}

impl<const N: usize> Deref for InlineStr<N> {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> fmt::Display for InlineStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> fmt::Debug for InlineStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}
