//! WS-Discovery probe loop and device extraction.
//!
//! Provides the transport boundary, the bounded probe/collect loop, and
//! per-match device record extraction.

pub mod extract;
pub mod service;
pub mod transport;

pub use service::{discover, discover_with_transport};
pub use transport::{Transport, UdpTransport};
