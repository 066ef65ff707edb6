//! # Extension Frame Builders
//!
//! Assembles the four connection-lifecycle metadata frames into flat byte
//! sequences with a fixed field order.
//!
//! ## Frame Kinds
//! - **RouteEx**: configured destination, attached at route-configuration time
//! - **BeginEx**: per-stream metadata attached when a stream begins
//! - **EndEx**: close-of-stream metadata
//! - **AbortEx**: abort-reason metadata
//!
//! Each kind pairs a consuming fluent builder with a decoded view. Setters
//! are order-independent and last-write-wins; `build()` refuses to emit a
//! frame with a mandatory field unset. The protocol engine reads the result
//! by offset, so the layout is deterministic and byte-for-byte testable.
//!
//! ## Usage
//! ```rust
//! use socks_frames::core::frame::{route_ex, RouteEx};
//!
//! # fn main() -> socks_frames::error::Result<()> {
//! let bytes = route_ex().address("127.0.0.1")?.port(8080).build()?;
//! let view = RouteEx::decode(&bytes)?;
//! assert_eq!(view.port, 8080);
//! # Ok(())
//! # }
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::address::SocketAddress;
use crate::error::{FrameError, Result};

/// Start assembling a route extension frame.
pub fn route_ex() -> RouteExBuilder {
    RouteExBuilder::default()
}

/// Start assembling a begin extension frame.
pub fn begin_ex() -> BeginExBuilder {
    BeginExBuilder::default()
}

/// Start assembling an end extension frame.
pub fn end_ex() -> EndExBuilder {
    EndExBuilder::default()
}

/// Start assembling an abort extension frame.
pub fn abort_ex() -> AbortExBuilder {
    AbortExBuilder::default()
}

/// Write a finished frame into the front of a caller-supplied buffer.
fn write_checked<F: FrameView>(frame: &F, buf: &mut [u8]) -> Result<usize> {
    let needed = frame.wire_len();
    if buf.len() < needed {
        return Err(FrameError::BufferTooSmall {
            needed,
            capacity: buf.len(),
        });
    }
    let mut cursor = &mut buf[..needed];
    frame.encode_into(&mut cursor);
    Ok(needed)
}

/// Internal contract shared by the four decoded views.
trait FrameView {
    fn wire_len(&self) -> usize;
    fn encode_into<B: BufMut>(&self, buf: &mut B);
}

fn freeze<F: FrameView>(kind: &'static str, frame: &F) -> Bytes {
    let mut buf = BytesMut::with_capacity(frame.wire_len());
    frame.encode_into(&mut buf);
    let bytes = buf.freeze();
    debug!(frame = kind, len = bytes.len(), "assembled extension frame");
    bytes
}

fn read_i32(buf: &[u8]) -> Result<i32> {
    if buf.len() < 4 {
        return Err(FrameError::TruncatedFrame {
            expected: 4,
            actual: buf.len(),
        });
    }
    Ok(i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

fn read_u16(buf: &[u8]) -> Result<u16> {
    if buf.len() < 2 {
        return Err(FrameError::TruncatedFrame {
            expected: 2,
            actual: buf.len(),
        });
    }
    Ok(u16::from_be_bytes([buf[0], buf[1]]))
}

// ============================================================================
// RouteEx: [address][port:u16]
// ============================================================================

/// Decoded view of a route extension frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEx {
    pub address: SocketAddress,
    pub port: u16,
}

impl RouteEx {
    /// Read a route frame back from `buf`. Trailing bytes are ignored, the
    /// way the engine reads frames embedded in a larger envelope.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let (address, consumed) = SocketAddress::decode(buf)?;
        let port = read_u16(&buf[consumed..])?;
        Ok(RouteEx { address, port })
    }
}

impl FrameView for RouteEx {
    fn wire_len(&self) -> usize {
        self.address.wire_len() + 2
    }

    fn encode_into<B: BufMut>(&self, buf: &mut B) {
        self.address.encode_into(buf);
        buf.put_u16(self.port);
    }
}

/// Fluent builder for [`RouteEx`]. Consumed by `build()`.
#[derive(Debug, Default)]
pub struct RouteExBuilder {
    address: Option<SocketAddress>,
    port: Option<u16>,
}

impl RouteExBuilder {
    /// Set the destination address from a text literal. Malformed literals
    /// fail here, before any frame bytes exist.
    pub fn address(mut self, text: &str) -> Result<Self> {
        self.address = Some(SocketAddress::parse(text)?);
        Ok(self)
    }

    /// Set the destination port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Finish the frame, or fail with [`FrameError::IncompleteFrame`] if a
    /// mandatory field was never set.
    pub fn build(self) -> Result<Bytes> {
        Ok(freeze("route", &self.finish()?))
    }

    /// Finish the frame into a fixed-capacity buffer, returning the number
    /// of bytes written.
    pub fn build_into(self, buf: &mut [u8]) -> Result<usize> {
        write_checked(&self.finish()?, buf)
    }

    fn finish(self) -> Result<RouteEx> {
        let address = self.address.ok_or(FrameError::IncompleteFrame {
            frame: "route",
            field: "address",
        })?;
        let port = self.port.ok_or(FrameError::IncompleteFrame {
            frame: "route",
            field: "port",
        })?;
        Ok(RouteEx { address, port })
    }
}

// ============================================================================
// BeginEx: [typeId:i32][address][port:u16]
// ============================================================================

/// Decoded view of a begin extension frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeginEx {
    pub type_id: i32,
    pub address: SocketAddress,
    pub port: u16,
}

impl BeginEx {
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let type_id = read_i32(buf)?;
        let (address, consumed) = SocketAddress::decode(&buf[4..])?;
        let port = read_u16(&buf[4 + consumed..])?;
        Ok(BeginEx {
            type_id,
            address,
            port,
        })
    }
}

impl FrameView for BeginEx {
    fn wire_len(&self) -> usize {
        4 + self.address.wire_len() + 2
    }

    fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_i32(self.type_id);
        self.address.encode_into(buf);
        buf.put_u16(self.port);
    }
}

/// Fluent builder for [`BeginEx`]. Consumed by `build()`.
#[derive(Debug, Default)]
pub struct BeginExBuilder {
    type_id: Option<i32>,
    address: Option<SocketAddress>,
    port: Option<u16>,
}

impl BeginExBuilder {
    /// Set the wire extension schema identifier (forward vs. reverse).
    pub fn type_id(mut self, type_id: i32) -> Self {
        self.type_id = Some(type_id);
        self
    }

    /// Set the stream address from a text literal. Malformed literals fail
    /// here, before any frame bytes exist.
    pub fn address(mut self, text: &str) -> Result<Self> {
        self.address = Some(SocketAddress::parse(text)?);
        Ok(self)
    }

    /// Set the stream port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Finish the frame, or fail with [`FrameError::IncompleteFrame`] if a
    /// mandatory field was never set.
    pub fn build(self) -> Result<Bytes> {
        Ok(freeze("begin", &self.finish()?))
    }

    /// Finish the frame into a fixed-capacity buffer, returning the number
    /// of bytes written.
    pub fn build_into(self, buf: &mut [u8]) -> Result<usize> {
        write_checked(&self.finish()?, buf)
    }

    fn finish(self) -> Result<BeginEx> {
        let type_id = self.type_id.ok_or(FrameError::IncompleteFrame {
            frame: "begin",
            field: "type_id",
        })?;
        let address = self.address.ok_or(FrameError::IncompleteFrame {
            frame: "begin",
            field: "address",
        })?;
        let port = self.port.ok_or(FrameError::IncompleteFrame {
            frame: "begin",
            field: "port",
        })?;
        Ok(BeginEx {
            type_id,
            address,
            port,
        })
    }
}

// ============================================================================
// EndEx: [typeId:i32]
// ============================================================================

/// Decoded view of an end extension frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndEx {
    pub type_id: i32,
}

impl EndEx {
    pub fn decode(buf: &[u8]) -> Result<Self> {
        Ok(EndEx {
            type_id: read_i32(buf)?,
        })
    }
}

impl FrameView for EndEx {
    fn wire_len(&self) -> usize {
        4
    }

    fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_i32(self.type_id);
    }
}

/// Fluent builder for [`EndEx`]. Consumed by `build()`.
#[derive(Debug, Default)]
pub struct EndExBuilder {
    type_id: Option<i32>,
}

impl EndExBuilder {
    pub fn type_id(mut self, type_id: i32) -> Self {
        self.type_id = Some(type_id);
        self
    }

    pub fn build(self) -> Result<Bytes> {
        Ok(freeze("end", &self.finish()?))
    }

    pub fn build_into(self, buf: &mut [u8]) -> Result<usize> {
        write_checked(&self.finish()?, buf)
    }

    fn finish(self) -> Result<EndEx> {
        let type_id = self.type_id.ok_or(FrameError::IncompleteFrame {
            frame: "end",
            field: "type_id",
        })?;
        Ok(EndEx { type_id })
    }
}

// ============================================================================
// AbortEx: [typeId:i32][reason:i32]
// ============================================================================

/// Decoded view of an abort extension frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbortEx {
    pub type_id: i32,
    pub reason: i32,
}

impl AbortEx {
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let type_id = read_i32(buf)?;
        let reason = read_i32(&buf[4..])?;
        Ok(AbortEx { type_id, reason })
    }
}

impl FrameView for AbortEx {
    fn wire_len(&self) -> usize {
        8
    }

    fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_i32(self.type_id);
        buf.put_i32(self.reason);
    }
}

/// Fluent builder for [`AbortEx`]. Consumed by `build()`.
#[derive(Debug, Default)]
pub struct AbortExBuilder {
    type_id: Option<i32>,
    reason: Option<i32>,
}

impl AbortExBuilder {
    pub fn type_id(mut self, type_id: i32) -> Self {
        self.type_id = Some(type_id);
        self
    }

    /// Set the numeric abort-reason code.
    pub fn reason(mut self, reason: i32) -> Self {
        self.reason = Some(reason);
        self
    }

    pub fn build(self) -> Result<Bytes> {
        Ok(freeze("abort", &self.finish()?))
    }

    pub fn build_into(self, buf: &mut [u8]) -> Result<usize> {
        write_checked(&self.finish()?, buf)
    }

    fn finish(self) -> Result<AbortEx> {
        let type_id = self.type_id.ok_or(FrameError::IncompleteFrame {
            frame: "abort",
            field: "type_id",
        })?;
        let reason = self.reason.ok_or(FrameError::IncompleteFrame {
            frame: "abort",
            field: "reason",
        })?;
        Ok(AbortEx { type_id, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_layout() {
        let bytes = route_ex()
            .address("127.0.0.1")
            .expect("valid address")
            .port(8080)
            .build()
            .expect("complete frame");
        assert_eq!(bytes.as_ref(), &[0x01, 127, 0, 0, 1, 0x1f, 0x90]);
    }

    #[test]
    fn test_begin_layout() {
        let bytes = begin_ex()
            .type_id(7)
            .address("example.com")
            .expect("valid address")
            .port(8080)
            .build()
            .expect("complete frame");

        let mut expected = vec![0, 0, 0, 7, 0x03, 11];
        expected.extend_from_slice(b"example.com");
        expected.extend_from_slice(&[0x1f, 0x90]);
        assert_eq!(bytes.as_ref(), &expected[..]);
    }

    #[test]
    fn test_end_and_abort_layout() {
        let end = end_ex().type_id(-1).build().expect("complete frame");
        assert_eq!(end.as_ref(), &[0xff, 0xff, 0xff, 0xff]);

        let abort = abort_ex()
            .type_id(1)
            .reason(0x0102_0304)
            .build()
            .expect("complete frame");
        assert_eq!(abort.as_ref(), &[0, 0, 0, 1, 1, 2, 3, 4]);
    }

    #[test]
    fn test_incomplete_frames() {
        assert_eq!(
            route_ex().port(80).build().unwrap_err(),
            FrameError::IncompleteFrame {
                frame: "route",
                field: "address",
            }
        );
        assert_eq!(
            begin_ex()
                .type_id(0)
                .port(80)
                .build()
                .unwrap_err(),
            FrameError::IncompleteFrame {
                frame: "begin",
                field: "address",
            }
        );
        assert_eq!(
            end_ex().build().unwrap_err(),
            FrameError::IncompleteFrame {
                frame: "end",
                field: "type_id",
            }
        );
        assert_eq!(
            abort_ex().type_id(1).build().unwrap_err(),
            FrameError::IncompleteFrame {
                frame: "abort",
                field: "reason",
            }
        );
    }

    #[test]
    fn test_setters_last_write_wins() {
        let bytes = route_ex()
            .address("10.0.0.1")
            .expect("valid address")
            .address("127.0.0.1")
            .expect("valid address")
            .port(1)
            .port(8080)
            .build()
            .expect("complete frame");
        let view = RouteEx::decode(&bytes).expect("decode");
        assert_eq!(view.address, SocketAddress::Ipv4([127, 0, 0, 1]));
        assert_eq!(view.port, 8080);
    }

    #[test]
    fn test_build_into_fixed_buffer() {
        let mut buf = [0u8; 16];
        let written = route_ex()
            .address("127.0.0.1")
            .expect("valid address")
            .port(8080)
            .build_into(&mut buf)
            .expect("fits");
        assert_eq!(written, 7);
        assert_eq!(&buf[..written], &[0x01, 127, 0, 0, 1, 0x1f, 0x90]);

        let mut small = [0u8; 4];
        assert_eq!(
            route_ex()
                .address("127.0.0.1")
                .expect("valid address")
                .port(8080)
                .build_into(&mut small)
                .unwrap_err(),
            FrameError::BufferTooSmall {
                needed: 7,
                capacity: 4,
            }
        );
    }

    #[test]
    fn test_frames_fit_scratch_bound() {
        use crate::config::MAX_FRAME_SIZE;

        let worst_case = begin_ex()
            .type_id(i32::MAX)
            .address(&format!("{}.example.com", "a".repeat(63)))
            .expect("valid address")
            .port(u16::MAX)
            .build()
            .expect("complete frame");
        assert!(worst_case.len() <= MAX_FRAME_SIZE);
    }

    #[test]
    fn test_decode_roundtrips() {
        let bytes = begin_ex()
            .type_id(2)
            .address("2001:db8::1")
            .expect("valid address")
            .port(443)
            .build()
            .expect("complete frame");
        let view = BeginEx::decode(&bytes).expect("decode");
        assert_eq!(view.type_id, 2);
        assert_eq!(view.port, 443);
        assert!(matches!(view.address, SocketAddress::Ipv6(_)));

        let abort = AbortEx::decode(&[0, 0, 0, 9, 0, 0, 0, 5]).expect("decode");
        assert_eq!(abort, AbortEx { type_id: 9, reason: 5 });
    }

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(
            RouteEx::decode(&[0x01, 127, 0, 0, 1, 0x1f]),
            Err(FrameError::TruncatedFrame { .. })
        ));
        assert!(matches!(
            BeginEx::decode(&[0, 0, 0]),
            Err(FrameError::TruncatedFrame { .. })
        ));
        assert!(matches!(
            EndEx::decode(&[]),
            Err(FrameError::TruncatedFrame { .. })
        ));
        assert!(matches!(
            AbortEx::decode(&[0, 0, 0, 1, 0]),
            Err(FrameError::TruncatedFrame { .. })
        ));
    }
}
