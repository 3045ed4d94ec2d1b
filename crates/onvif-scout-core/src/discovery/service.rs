//! WS-Discovery probe/collect loop.
//!
//! Sends a single multicast probe, then collects unicast replies until the
//! timeout elapses or the caller cancels. Decoding happens after the loop,
//! on whatever was collected.

use std::time::Duration;

use log::{debug, warn};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::discovery::extract::device_from_match;
use crate::discovery::transport::{Transport, UdpTransport};
use crate::error::{DecodeError, Result};
use crate::protocol::envelope::parse_probe_response;
use crate::protocol::probe::{multicast_endpoint, new_probe_message};
use crate::types::{DiscoveryDevice, RawReply};

/// Discover devices using a freshly bound UDP transport.
pub async fn discover(
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<Vec<DiscoveryDevice>> {
    let transport = UdpTransport::bind()?;
    discover_with_transport(timeout, transport, cancel).await
}

/// Discover devices using a caller-supplied transport.
///
/// The transport is closed before this returns, on every path. Transport
/// and decode failures are fatal; timer expiry and cancellation are not.
pub async fn discover_with_transport<T: Transport>(
    timeout: Duration,
    mut transport: T,
    cancel: CancellationToken,
) -> Result<Vec<DiscoveryDevice>> {
    let collected = collect_replies(&mut transport, timeout, &cancel).await;
    transport.close();
    let replies = collected?;

    // An external cancel discards already-collected replies; only the
    // internal timer keeps them. TODO: revisit whether cancellation should
    // return partial results instead.
    if cancel.is_cancelled() {
        return Ok(Vec::new());
    }

    devices_from_replies(&replies)
}

async fn collect_replies<T: Transport>(
    transport: &mut T,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Vec<RawReply>> {
    let probe = new_probe_message();
    transport.send(&probe, multicast_endpoint()).await?;

    let deadline = Instant::now() + timeout;
    let mut replies = Vec::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = sleep_until(deadline) => break,
            received = transport.recv() => {
                let reply = received?;
                debug!("Received {} bytes from {}", reply.payload.len(), reply.source);
                replies.push(reply);
            }
        }
    }

    Ok(replies)
}

/// Decode collected replies into device records.
///
/// Replies are processed in arrival order and matches in reply order.
/// Empty payloads contribute nothing. A malformed envelope fails the whole
/// batch; a structurally incomplete match is dropped with a diagnostic
/// while its siblings are kept.
pub fn devices_from_replies(replies: &[RawReply]) -> Result<Vec<DiscoveryDevice>> {
    let mut devices = Vec::new();

    for reply in replies {
        if reply.payload.is_empty() {
            continue;
        }

        let text = std::str::from_utf8(&reply.payload).map_err(DecodeError::from)?;

        for probe_match in parse_probe_response(text)? {
            match device_from_match(probe_match, reply.source.ip()) {
                Ok(device) => devices.push(device),
                Err(e) => warn!("Dropping probe match: {}", e),
            }
        }
    }

    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::io;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::error::DiscoveryError;

    fn reply_xml(xaddrs: &str, scopes: &str) -> String {
        format!(
            "<Envelope><Body><ProbeMatches><ProbeMatch>\
             <XAddrs>{}</XAddrs><Types>dn:NetworkVideoTransmitter</Types>\
             <Scopes>{}</Scopes>\
             </ProbeMatch></ProbeMatches></Body></Envelope>",
            xaddrs, scopes
        )
    }

    fn reply_from(addr: &str, body: &str) -> RawReply {
        RawReply {
            source: addr.parse().unwrap(),
            payload: Bytes::copy_from_slice(body.as_bytes()),
        }
    }

    /// Scripted transport: hands out queued results, then blocks forever.
    struct FakeTransport {
        replies: VecDeque<io::Result<RawReply>>,
        closed: Arc<AtomicBool>,
    }

    impl FakeTransport {
        fn new(replies: Vec<io::Result<RawReply>>) -> (Self, Arc<AtomicBool>) {
            let closed = Arc::new(AtomicBool::new(false));
            let transport = Self {
                replies: replies.into(),
                closed: closed.clone(),
            };
            (transport, closed)
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&mut self, _payload: &[u8], _target: SocketAddr) -> io::Result<()> {
            Ok(())
        }

        async fn recv(&mut self) -> io::Result<RawReply> {
            match self.replies.pop_front() {
                Some(result) => result,
                None => std::future::pending().await,
            }
        }

        fn close(&mut self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_no_replies_returns_empty_within_timeout() {
        let (transport, closed) = FakeTransport::new(Vec::new());

        let start = std::time::Instant::now();
        let devices = discover_with_transport(
            Duration::from_millis(100),
            transport,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(devices.is_empty());
        assert!(start.elapsed() < Duration::from_secs(2));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_devices_in_reply_order() {
        let (transport, _) = FakeTransport::new(vec![
            Ok(reply_from(
                "192.168.1.20:3702",
                &reply_xml("http://192.168.1.20/onvif", "onvif://www.onvif.org/name/First"),
            )),
            Ok(reply_from(
                "192.168.1.21:3702",
                &reply_xml("http://192.168.1.21/onvif", "onvif://www.onvif.org/name/Second"),
            )),
        ]);

        let devices = discover_with_transport(
            Duration::from_millis(100),
            transport,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].name, "First");
        assert_eq!(devices[0].address.to_string(), "192.168.1.20");
        assert_eq!(devices[1].name, "Second");
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_returns_empty() {
        let (transport, closed) = FakeTransport::new(vec![Ok(reply_from(
            "192.168.1.20:3702",
            &reply_xml("http://a", ""),
        ))]);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let devices = discover_with_transport(Duration::from_secs(5), transport, cancel)
            .await
            .unwrap();

        assert!(devices.is_empty());
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_mid_discovery_discards_replies() {
        let (transport, closed) = FakeTransport::new(vec![Ok(reply_from(
            "192.168.1.20:3702",
            &reply_xml("http://a", ""),
        ))]);

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let start = std::time::Instant::now();
        let devices = discover_with_transport(Duration::from_secs(30), transport, cancel)
            .await
            .unwrap();

        assert!(devices.is_empty());
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_empty_payload_is_skipped() {
        let (transport, _) = FakeTransport::new(vec![
            Ok(reply_from("192.168.1.20:3702", "")),
            Ok(reply_from(
                "192.168.1.21:3702",
                &reply_xml("http://b", "onvif://www.onvif.org/hardware/M2"),
            )),
        ]);

        let devices = discover_with_transport(
            Duration::from_millis(100),
            transport,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].model, "M2");
    }

    #[tokio::test]
    async fn test_malformed_envelope_fails_the_batch() {
        let (transport, closed) = FakeTransport::new(vec![
            Ok(reply_from(
                "192.168.1.20:3702",
                &reply_xml("http://a", ""),
            )),
            Ok(reply_from("192.168.1.21:3702", "<Envelope><Body></Envelope>")),
        ]);

        let result = discover_with_transport(
            Duration::from_millis(100),
            transport,
            CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(DiscoveryError::Decode(_))));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_incomplete_match_is_dropped_not_fatal() {
        let xml = "<Envelope><Body><ProbeMatches>\
                   <ProbeMatch><XAddrs>http://good</XAddrs><Types>t</Types><Scopes>onvif://www.onvif.org/name/Kept</Scopes></ProbeMatch>\
                   <ProbeMatch><Types>t</Types><Scopes>s</Scopes></ProbeMatch>\
                   </ProbeMatches></Body></Envelope>";

        let (transport, _) =
            FakeTransport::new(vec![Ok(reply_from("192.168.1.20:3702", xml))]);

        let devices = discover_with_transport(
            Duration::from_millis(100),
            transport,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "Kept");
        assert_eq!(devices[0].xaddresses, vec!["http://good"]);
    }

    #[tokio::test]
    async fn test_receive_error_is_fatal() {
        let (transport, closed) = FakeTransport::new(vec![Err(io::Error::new(
            io::ErrorKind::Other,
            "network down",
        ))]);

        let result = discover_with_transport(
            Duration::from_secs(5),
            transport,
            CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(DiscoveryError::Transport(_))));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_probe_is_sent_to_multicast_group() {
        struct ProbeCapture {
            sent: Arc<std::sync::Mutex<Vec<SocketAddr>>>,
        }

        #[async_trait]
        impl Transport for ProbeCapture {
            async fn send(&mut self, _payload: &[u8], target: SocketAddr) -> io::Result<()> {
                self.sent.lock().unwrap().push(target);
                Ok(())
            }

            async fn recv(&mut self) -> io::Result<RawReply> {
                std::future::pending().await
            }

            fn close(&mut self) {}
        }

        let sent = Arc::new(std::sync::Mutex::new(Vec::new()));
        let transport = ProbeCapture { sent: sent.clone() };

        discover_with_transport(
            Duration::from_millis(50),
            transport,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], "239.255.255.250:3702".parse::<SocketAddr>().unwrap());
    }
}
