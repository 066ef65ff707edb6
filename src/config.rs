//! # Wire Constants
//!
//! Centralized wire-level constants for the frame codec.
//!
//! Tag values follow the SOCKS5 address-type codes (RFC 1928 §4) so that
//! frames carry the same discriminants the surrounding protocol engine
//! already speaks.

/// Address tag byte for a 4-byte IPv4 payload
pub const ADDR_TAG_IPV4: u8 = 0x01;

/// Address tag byte for a length-prefixed domain-name payload
pub const ADDR_TAG_DOMAIN: u8 = 0x03;

/// Address tag byte for a 16-byte IPv6 payload
pub const ADDR_TAG_IPV6: u8 = 0x04;

/// Upper bound on any assembled frame (8 KB), for engine-side scratch-buffer
/// sizing. Builders size their output exactly, so nothing checks this at
/// runtime; the worst-case frame (begin with a maximal domain name) stays
/// far below it.
pub const MAX_FRAME_SIZE: usize = 8 * 1024;

/// Max total length of a domain name, in bytes
pub const MAX_DOMAIN_NAME_LEN: usize = 253;

/// Max length of a single domain-name label, in bytes
pub const MAX_LABEL_LEN: usize = 63;

/// Worst-case encoded address: domain tag + length byte + 255 name bytes
pub const MAX_ADDRESS_SIZE: usize = 1 + 1 + 255;
