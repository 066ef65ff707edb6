//! # Socket Address Codec
//!
//! Classifies a text address literal into one of three variants and
//! serializes it into a tagged binary form the protocol engine reads back
//! without re-parsing text.
//!
//! ## Classification (ordered, first match wins)
//! 1. **IPv4**: four dot-separated decimal octets, no redundant leading zeros
//! 2. **IPv6**: eight colon-separated hex groups, or RFC 4291 `::`
//!    zero-compression with exactly one `::`
//! 3. **Domain**: dot-separated hostname labels, alphabetic top-level label
//!
//! A literal that commits to a numeric grammar but carries an out-of-range
//! component is rejected outright rather than reinterpreted as a domain.
//!
//! ## Wire Format
//! ```text
//! [Tag(1)] [Payload]
//!   tag 0x01 -> 4 raw IPv4 bytes, network order
//!   tag 0x04 -> 16 raw IPv6 bytes, network order
//!   tag 0x03 -> [Len(1)] [Name(Len)]
//! ```

use std::fmt;
use std::str::FromStr;

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{
    ADDR_TAG_DOMAIN, ADDR_TAG_IPV4, ADDR_TAG_IPV6, MAX_DOMAIN_NAME_LEN, MAX_LABEL_LEN,
};
use crate::error::{FrameError, Result};

/// A classified socket address, exactly one variant active.
///
/// The tag byte uniquely determines the payload length, so no variant is
/// ever partially written or ambiguously read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketAddress {
    /// Four raw octets, network order
    Ipv4([u8; 4]),
    /// Sixteen raw octets, network order
    Ipv6([u8; 16]),
    /// Validated hostname, stored verbatim
    Domain(String),
}

impl SocketAddress {
    /// Classify and validate a text literal.
    ///
    /// Fails with [`FrameError::InvalidAddressFormat`] when the literal
    /// matches none of the three grammars, or matches a numeric grammar
    /// with an out-of-range component.
    pub fn parse(text: &str) -> Result<Self> {
        if looks_like_ipv4(text) {
            let octets = parse_ipv4(text)?;
            trace!(address = text, kind = "ipv4", "classified address literal");
            return Ok(SocketAddress::Ipv4(octets));
        }
        if text.contains(':') {
            let octets = parse_ipv6(text)?;
            trace!(address = text, kind = "ipv6", "classified address literal");
            return Ok(SocketAddress::Ipv6(octets));
        }
        let name = parse_domain(text)?;
        trace!(address = text, kind = "domain", "classified address literal");
        Ok(SocketAddress::Domain(name))
    }

    /// The one-byte discriminant written ahead of the payload.
    pub fn tag(&self) -> u8 {
        match self {
            SocketAddress::Ipv4(_) => ADDR_TAG_IPV4,
            SocketAddress::Ipv6(_) => ADDR_TAG_IPV6,
            SocketAddress::Domain(_) => ADDR_TAG_DOMAIN,
        }
    }

    /// Encoded size in bytes, tag included.
    pub fn wire_len(&self) -> usize {
        match self {
            SocketAddress::Ipv4(_) => 1 + 4,
            SocketAddress::Ipv6(_) => 1 + 16,
            SocketAddress::Domain(name) => 1 + 1 + name.len(),
        }
    }

    /// Write tag then payload into `buf`.
    ///
    /// `Domain` names longer than 255 bytes cannot be represented by the
    /// one-byte length prefix; `parse` caps them well below that.
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.tag());
        match self {
            SocketAddress::Ipv4(octets) => buf.put_slice(octets),
            SocketAddress::Ipv6(octets) => buf.put_slice(octets),
            SocketAddress::Domain(name) => {
                debug_assert!(name.len() <= u8::MAX as usize);
                buf.put_u8(name.len() as u8);
                buf.put_slice(name.as_bytes());
            }
        }
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_len());
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Read a tagged address back from the front of `buf`, returning the
    /// address and the number of bytes consumed.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        let (&tag, rest) = buf.split_first().ok_or(FrameError::TruncatedFrame {
            expected: 1,
            actual: 0,
        })?;
        match tag {
            ADDR_TAG_IPV4 => {
                let payload = take(rest, 4)?;
                let mut octets = [0u8; 4];
                octets.copy_from_slice(payload);
                Ok((SocketAddress::Ipv4(octets), 1 + 4))
            }
            ADDR_TAG_IPV6 => {
                let payload = take(rest, 16)?;
                let mut octets = [0u8; 16];
                octets.copy_from_slice(payload);
                Ok((SocketAddress::Ipv6(octets), 1 + 16))
            }
            ADDR_TAG_DOMAIN => {
                let (&len, rest) = rest.split_first().ok_or(FrameError::TruncatedFrame {
                    expected: 1,
                    actual: 0,
                })?;
                let payload = take(rest, len as usize)?;
                let name = std::str::from_utf8(payload).map_err(|_| {
                    FrameError::invalid_address("<binary>", "domain payload is not valid UTF-8")
                })?;
                Ok((SocketAddress::Domain(name.to_string()), 2 + len as usize))
            }
            other => Err(FrameError::UnknownAddressTag(other)),
        }
    }
}

impl fmt::Display for SocketAddress {
    /// Canonical text form: dotted decimal, full-form lowercase colon-hex
    /// without leading zeros, or the stored domain unchanged.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketAddress::Ipv4(o) => write!(f, "{}.{}.{}.{}", o[0], o[1], o[2], o[3]),
            SocketAddress::Ipv6(o) => {
                for i in 0..8 {
                    if i > 0 {
                        f.write_str(":")?;
                    }
                    let group = u16::from_be_bytes([o[2 * i], o[2 * i + 1]]);
                    write!(f, "{group:x}")?;
                }
                Ok(())
            }
            SocketAddress::Domain(name) => f.write_str(name),
        }
    }
}

impl FromStr for SocketAddress {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        SocketAddress::parse(s)
    }
}

/// Split off exactly `n` bytes or report how short the buffer fell.
fn take(buf: &[u8], n: usize) -> Result<&[u8]> {
    if buf.len() < n {
        return Err(FrameError::TruncatedFrame {
            expected: n,
            actual: buf.len(),
        });
    }
    Ok(&buf[..n])
}

/// Shape test that commits a literal to the IPv4 grammar: exactly four
/// dot-separated, non-empty, all-digit groups. Range errors are then hard
/// failures, never reinterpreted as a domain name.
fn looks_like_ipv4(text: &str) -> bool {
    let mut groups = 0;
    for group in text.split('.') {
        if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        groups += 1;
    }
    groups == 4
}

fn parse_ipv4(text: &str) -> Result<[u8; 4]> {
    let mut octets = [0u8; 4];
    for (i, group) in text.split('.').enumerate() {
        if group.len() > 1 && group.starts_with('0') {
            return Err(FrameError::invalid_address(
                text,
                format!("IPv4 octet {group:?} has a redundant leading zero"),
            ));
        }
        if group.len() > 3 {
            return Err(FrameError::invalid_address(
                text,
                format!("IPv4 octet {group:?} exceeds 255"),
            ));
        }
        // looks_like_ipv4 guarantees 1-3 decimal digits, so only the range
        // can still be wrong
        let value: u16 = group
            .parse()
            .map_err(|_| FrameError::invalid_address(text, "unparseable IPv4 octet"))?;
        if value > 255 {
            return Err(FrameError::invalid_address(
                text,
                format!("IPv4 octet {group:?} exceeds 255"),
            ));
        }
        octets[i] = value as u8;
    }
    Ok(octets)
}

fn parse_ipv6(text: &str) -> Result<[u8; 16]> {
    let mut octets = [0u8; 16];
    match text.find("::") {
        None => {
            // full form: exactly 8 groups
            let mut count = 0;
            for group in text.split(':') {
                if count == 8 {
                    return Err(FrameError::invalid_address(
                        text,
                        "IPv6 literal has more than 8 groups",
                    ));
                }
                let value = parse_ipv6_group(text, group)?;
                octets[2 * count..2 * count + 2].copy_from_slice(&value.to_be_bytes());
                count += 1;
            }
            if count != 8 {
                return Err(FrameError::invalid_address(
                    text,
                    format!("IPv6 literal has {count} groups, expected 8"),
                ));
            }
        }
        Some(pos) => {
            let head = &text[..pos];
            let tail = &text[pos + 2..];
            if tail.contains("::") || tail.starts_with(':') {
                return Err(FrameError::invalid_address(
                    text,
                    "IPv6 literal has more than one `::`",
                ));
            }
            let head_groups: Vec<&str> = if head.is_empty() {
                Vec::new()
            } else {
                head.split(':').collect()
            };
            let tail_groups: Vec<&str> = if tail.is_empty() {
                Vec::new()
            } else {
                tail.split(':').collect()
            };
            // `::` elides at least one zero group
            if head_groups.len() + tail_groups.len() > 7 {
                return Err(FrameError::invalid_address(
                    text,
                    "IPv6 literal expands to more than 8 groups",
                ));
            }
            // zero-fill, then write leading groups from the front and
            // trailing groups anchored at the end; the middle stays zero
            for (i, group) in head_groups.iter().copied().enumerate() {
                let value = parse_ipv6_group(text, group)?;
                octets[2 * i..2 * i + 2].copy_from_slice(&value.to_be_bytes());
            }
            let base = 16 - 2 * tail_groups.len();
            for (i, group) in tail_groups.iter().copied().enumerate() {
                let value = parse_ipv6_group(text, group)?;
                octets[base + 2 * i..base + 2 * i + 2].copy_from_slice(&value.to_be_bytes());
            }
        }
    }
    Ok(octets)
}

fn parse_ipv6_group(text: &str, group: &str) -> Result<u16> {
    if group.is_empty() {
        return Err(FrameError::invalid_address(text, "empty IPv6 group"));
    }
    if group.len() > 4 {
        return Err(FrameError::invalid_address(
            text,
            format!("IPv6 group {group:?} has more than 4 hex digits"),
        ));
    }
    // from_str_radix tolerates a leading `+`; a group is hex digits only
    if !group.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FrameError::invalid_address(
            text,
            format!("IPv6 group {group:?} is not hexadecimal"),
        ));
    }
    u16::from_str_radix(group, 16).map_err(|_| {
        FrameError::invalid_address(text, format!("IPv6 group {group:?} is not hexadecimal"))
    })
}

fn parse_domain(text: &str) -> Result<String> {
    if text.is_empty() {
        return Err(FrameError::invalid_address(text, "empty address literal"));
    }
    if text.len() > MAX_DOMAIN_NAME_LEN {
        return Err(FrameError::invalid_address(
            text,
            format!("domain name exceeds {MAX_DOMAIN_NAME_LEN} bytes"),
        ));
    }
    let mut last_label = "";
    for label in text.split('.') {
        let bytes = label.as_bytes();
        if bytes.is_empty() {
            return Err(FrameError::invalid_address(text, "empty domain label"));
        }
        if bytes.len() > MAX_LABEL_LEN {
            return Err(FrameError::invalid_address(
                text,
                format!("domain label exceeds {MAX_LABEL_LEN} bytes"),
            ));
        }
        if !bytes[0].is_ascii_alphanumeric() || !bytes[bytes.len() - 1].is_ascii_alphanumeric() {
            return Err(FrameError::invalid_address(
                text,
                format!("domain label {label:?} must start and end with an alphanumeric"),
            ));
        }
        if !bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-') {
            return Err(FrameError::invalid_address(
                text,
                format!("domain label {label:?} contains an invalid character"),
            ));
        }
        last_label = label;
    }
    // top-level label is a short alphabetic run; this is also what keeps
    // overflowing numeric literals like "127.0.0.1001" out of the domain
    // grammar
    if last_label.len() < 2 || !last_label.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(FrameError::invalid_address(
            text,
            format!("top-level label {last_label:?} must be alphabetic"),
        ));
    }
    Ok(text.to_string())
}
