//! # socks-frames
//!
//! Socket-address literal codec and binary extension-frame builders for
//! SOCKS-style proxy metadata.
//!
//! The crate turns a human-readable address (dotted-decimal IPv4, colon-hex
//! IPv6 in any RFC 4291 compressed form, or a domain name) plus per-connection
//! metadata into a compact, self-describing, tagged binary record that a
//! protocol engine reads back by offset without re-parsing text.
//!
//! ## Components
//! - [`core::address`]: text classification and the tagged address wire form
//! - [`core::frame`]: Route/Begin/End/Abort extension-frame builders and views
//! - [`error`]: the synchronous, terminal error taxonomy
//! - [`config`]: wire constants shared by both layers
//!
//! ## Example
//! ```rust
//! use socks_frames::{begin_ex, BeginEx};
//!
//! # fn main() -> socks_frames::Result<()> {
//! let bytes = begin_ex()
//!     .type_id(1)
//!     .address("example.com")?
//!     .port(8080)
//!     .build()?;
//!
//! let view = BeginEx::decode(&bytes)?;
//! assert_eq!(view.address.to_string(), "example.com");
//! assert_eq!(view.port, 8080);
//! # Ok(())
//! # }
//! ```
//!
//! ## Scope
//! Everything here is synchronous and side-effect-free beyond writing into a
//! caller-owned buffer: no name resolution, no socket I/O, no negotiation.
//! Each builder owns its own scratch buffer, so the codec is freely usable
//! from multiple threads.

pub mod config;
pub mod core;
pub mod error;

pub use crate::core::address::SocketAddress;
pub use crate::core::frame::{abort_ex, begin_ex, end_ex, route_ex};
pub use crate::core::frame::{AbortEx, BeginEx, EndEx, RouteEx};
pub use crate::core::frame::{AbortExBuilder, BeginExBuilder, EndExBuilder, RouteExBuilder};
pub use crate::error::{FrameError, Result};
