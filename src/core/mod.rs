//! # Core Codec Components
//!
//! Address classification and extension-frame assembly.
//!
//! This module provides the foundation for the metadata layer: turning text
//! address literals into tagged binary form, and laying the four extension
//! frames out as flat byte sequences the protocol engine reads by offset.
//!
//! ## Components
//! - **Address**: text → tagged binary socket address, and back
//! - **Frame**: Route/Begin/End/Abort extension builders and decoded views
//!
//! ## Wire Format
//! ```text
//! Address:  [Tag(1)] [Payload(4 | 16 | 1+N)]
//! RouteEx:  [Address] [Port(2)]
//! BeginEx:  [TypeId(4)] [Address] [Port(2)]
//! EndEx:    [TypeId(4)]
//! AbortEx:  [TypeId(4)] [Reason(4)]
//! ```
//!
//! All integers are big-endian; the address tag is the only self-describing
//! discriminant, everything else is fixed-width.

pub mod address;
pub mod frame;
