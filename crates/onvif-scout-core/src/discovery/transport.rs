//! Datagram transport boundary.
//!
//! The discovery loop talks to the network only through [`Transport`], so
//! tests can substitute a scripted fake for the real socket.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use async_trait::async_trait;
use bytes::Bytes;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use crate::types::RawReply;

/// Receive buffer size for probe replies
const RECV_BUFFER_SIZE: usize = 4096;

/// Datagram send/receive capabilities required by the discovery loop.
///
/// No retry, reconnect, or backoff lives behind this boundary; failures
/// surface immediately to the caller.
#[async_trait]
pub trait Transport: Send {
    /// Send one datagram to `target`.
    async fn send(&mut self, payload: &[u8], target: SocketAddr) -> io::Result<()>;

    /// Wait for one datagram.
    async fn recv(&mut self) -> io::Result<RawReply>;

    /// Release the underlying resource. Idempotent, and safe to call even
    /// if the transport never opened successfully.
    fn close(&mut self);
}

/// Production transport backed by a UDP socket.
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    buf: Vec<u8>,
}

impl UdpTransport {
    /// Bind an ephemeral UDP socket suitable for multicast probing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind() -> io::Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

        socket.set_reuse_address(true)?;

        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
        socket.bind(&addr.into())?;

        socket.set_nonblocking(true)?;

        // Probe replies are unicast; TTL 1 keeps the probe itself link-local.
        socket.set_multicast_ttl_v4(1)?;

        let socket = UdpSocket::from_std(socket.into())?;

        Ok(Self {
            socket: Some(socket),
            buf: vec![0u8; RECV_BUFFER_SIZE],
        })
    }

    fn closed() -> io::Error {
        io::Error::new(io::ErrorKind::NotConnected, "transport is closed")
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn send(&mut self, payload: &[u8], target: SocketAddr) -> io::Result<()> {
        let socket = self.socket.as_ref().ok_or_else(Self::closed)?;
        socket.send_to(payload, target).await?;
        Ok(())
    }

    async fn recv(&mut self) -> io::Result<RawReply> {
        let socket = self.socket.as_ref().ok_or_else(Self::closed)?;
        let (len, source) = socket.recv_from(&mut self.buf).await?;

        Ok(RawReply {
            source,
            payload: Bytes::copy_from_slice(&self.buf[..len]),
        })
    }

    fn close(&mut self) {
        self.socket.take();
    }
}
