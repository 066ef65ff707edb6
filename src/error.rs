//! # Error Types
//!
//! Comprehensive error handling for the frame codec.
//!
//! This module defines all error variants that can occur while classifying
//! address literals, assembling extension frames, and decoding them back.
//!
//! ## Error Categories
//! - **Address Errors**: literals that match no supported grammar
//! - **Builder Errors**: frames finished with mandatory fields unset
//! - **Buffer Errors**: fixed-capacity output buffers too small for a frame
//! - **Decode Errors**: truncated byte sequences, unknown discriminant tags
//!
//! All errors are synchronous and terminal for the current encode/decode
//! attempt; malformed input does not become valid by retrying. All errors
//! implement `std::error::Error` for interoperability.
//!
//! ## Example Usage
//! ```rust
//! use socks_frames::error::{FrameError, Result};
//! use socks_frames::core::address::SocketAddress;
//!
//! fn classify(text: &str) -> Result<SocketAddress> {
//!     SocketAddress::parse(text)
//! }
//!
//! assert!(matches!(
//!     classify("127.0.0.1001"),
//!     Err(FrameError::InvalidAddressFormat { .. })
//! ));
//! ```

use thiserror::Error;

/// FrameError is the primary error type for all codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid address format {text:?}: {reason}")]
    InvalidAddressFormat { text: String, reason: String },

    #[error("incomplete {frame} frame: field `{field}` was never set")]
    IncompleteFrame {
        frame: &'static str,
        field: &'static str,
    },

    #[error("buffer too small: frame needs {needed} bytes, buffer holds {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },

    #[error("truncated frame: expected {expected} more bytes, found {actual}")]
    TruncatedFrame { expected: usize, actual: usize },

    #[error("unknown address tag: {0:#04x}")]
    UnknownAddressTag(u8),
}

impl FrameError {
    /// Shorthand for address-grammar rejections.
    pub(crate) fn invalid_address(text: &str, reason: impl Into<String>) -> Self {
        FrameError::InvalidAddressFormat {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// Type alias for Results using FrameError
pub type Result<T> = std::result::Result<T, FrameError>;
