//! Minimal OSC 1.0 message codec
//!
//! Implements exactly the subset of the wire format this bridge needs:
//! single messages with an address pattern, a type tag string, and a flat
//! argument list. Strings are NUL-terminated and padded to 4 bytes,
//! numeric payloads are big-endian.
//!
//! ```text
//! /avatar/parameters/Foo\0\0 ,f\0\0 40 48 f5 c3
//! └── address, padded ─────┘ └tags┘ └── f32 BE ┘
//! ```
//!
//! Accepted argument tags: `f`, `i`, `d`, `T`, `F`. Bundles are not
//! routed by this bridge and decode as an error. Decoding is total over
//! arbitrary input - malformed datagrams yield a typed error for the
//! caller to log and drop.

use thiserror::Error;

/// Codec failures for one datagram
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    /// Datagram ended before a complete element
    #[error("datagram truncated")]
    Truncated,

    /// Address pattern missing or not starting with '/'
    #[error("invalid address pattern")]
    BadAddress,

    /// Type tag string missing its ',' prefix
    #[error("invalid type tag string")]
    BadTypeTags,

    /// A string element is not valid UTF-8
    #[error("string element is not valid UTF-8")]
    InvalidUtf8,

    /// Argument tag this bridge does not handle
    #[error("unsupported type tag '{0}'")]
    UnsupportedTag(char),

    /// OSC bundles are not routed by this bridge
    #[error("bundles are not supported")]
    UnsupportedBundle,
}

/// One decoded argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OscArg {
    /// 32-bit float (`f`)
    Float(f32),
    /// 32-bit integer (`i`)
    Int(i32),
    /// 64-bit float (`d`)
    Double(f64),
    /// Argument-less boolean (`T` / `F`)
    Bool(bool),
}

impl OscArg {
    /// Numeric view of the argument, for handlers expecting a scalar
    pub fn as_f32(&self) -> f32 {
        match *self {
            OscArg::Float(v) => v,
            OscArg::Int(v) => v as f32,
            OscArg::Double(v) => v as f32,
            OscArg::Bool(true) => 1.0,
            OscArg::Bool(false) => 0.0,
        }
    }
}

/// One decoded OSC message
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    /// The address pattern, e.g. `/avatar/parameters/Foo`
    pub address: String,
    /// Arguments in wire order
    pub args: Vec<OscArg>,
}

impl OscMessage {
    /// The trailing argument as a scalar - the payload value by convention
    pub fn last_value(&self) -> Option<f32> {
        self.args.last().map(OscArg::as_f32)
    }
}

/// Encode a single-float message
pub fn encode_float(address: &str, value: f32) -> Vec<u8> {
    let mut out = Vec::with_capacity(padded_len(address.len() + 1) + 8);
    write_string(&mut out, address);
    write_string(&mut out, ",f");
    out.extend_from_slice(&value.to_be_bytes());
    out
}

/// Decode one datagram into a message
pub fn decode(datagram: &[u8]) -> Result<OscMessage, CodecError> {
    if datagram.starts_with(b"#bundle\0") {
        return Err(CodecError::UnsupportedBundle);
    }

    let (address, rest) = read_string(datagram)?;
    if !address.starts_with('/') {
        return Err(CodecError::BadAddress);
    }
    let address = address.to_string();

    // Messages without a type tag string carry no arguments
    if rest.is_empty() {
        return Ok(OscMessage {
            address,
            args: Vec::new(),
        });
    }

    let (tags, mut rest) = read_string(rest)?;
    let tags = tags.strip_prefix(',').ok_or(CodecError::BadTypeTags)?;

    let mut args = Vec::with_capacity(tags.len());
    for tag in tags.chars() {
        let arg = match tag {
            'f' => OscArg::Float(f32::from_be_bytes(take::<4>(&mut rest)?)),
            'i' => OscArg::Int(i32::from_be_bytes(take::<4>(&mut rest)?)),
            'd' => OscArg::Double(f64::from_be_bytes(take::<8>(&mut rest)?)),
            'T' => OscArg::Bool(true),
            'F' => OscArg::Bool(false),
            other => return Err(CodecError::UnsupportedTag(other)),
        };
        args.push(arg);
    }

    Ok(OscMessage { address, args })
}

/// Smallest multiple of 4 that fits `n` bytes
fn padded_len(n: usize) -> usize {
    (n + 3) & !3
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    // NUL terminator plus padding to the 4-byte boundary
    let padding = padded_len(s.len() + 1) - s.len();
    out.extend(std::iter::repeat(0u8).take(padding));
}

fn read_string(buf: &[u8]) -> Result<(&str, &[u8]), CodecError> {
    let nul = buf
        .iter()
        .position(|&b| b == 0)
        .ok_or(CodecError::Truncated)?;
    let s = std::str::from_utf8(&buf[..nul]).map_err(|_| CodecError::InvalidUtf8)?;
    let consumed = padded_len(nul + 1);
    if consumed > buf.len() {
        return Err(CodecError::Truncated);
    }
    Ok((s, &buf[consumed..]))
}

fn take<const N: usize>(buf: &mut &[u8]) -> Result<[u8; N], CodecError> {
    if buf.len() < N {
        return Err(CodecError::Truncated);
    }
    let (head, tail) = buf.split_at(N);
    *buf = tail;
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(head);
    Ok(bytes)
}
