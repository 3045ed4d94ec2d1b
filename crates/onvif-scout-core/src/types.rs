//! Shared types for device discovery.

use std::net::{IpAddr, SocketAddr};

use bytes::Bytes;
use serde::Serialize;

/// One datagram as received from the network.
#[derive(Debug, Clone)]
pub struct RawReply {
    /// Endpoint the reply came from
    pub source: SocketAddr,
    /// Raw payload, possibly empty
    pub payload: Bytes,
}

/// A device discovered via a WS-Discovery probe match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryDevice {
    /// Address the probe reply arrived from
    pub address: IpAddr,
    /// Service endpoint URIs advertised by the device, in reply order
    pub xaddresses: Vec<String>,
    /// Capability types advertised by the device, in reply order
    pub types: Vec<String>,
    /// Hardware model parsed from the scopes text (empty when absent)
    pub model: String,
    /// Friendly name parsed from the scopes text (empty when absent)
    pub name: String,
}
