//! Core library for ONVIF Scout device discovery.
//!
//! Discovers ONVIF-capable devices (IP cameras, NVRs) via WS-Discovery:
//! one multicast probe, a bounded receive window, and a structured
//! [`DiscoveryDevice`] record per probe match in the replies.

pub mod discovery;
pub mod error;
pub mod protocol;
pub mod types;

pub use discovery::service::{discover, discover_with_transport};
pub use discovery::transport::{Transport, UdpTransport};
pub use types::{DiscoveryDevice, RawReply};
