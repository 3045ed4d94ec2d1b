//! WS-Discovery probe message construction.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use uuid::Uuid;

/// Well-known WS-Discovery multicast group
pub const MULTICAST_ADDRESS: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);

/// Well-known WS-Discovery port
pub const MULTICAST_PORT: u16 = 3702;

/// Multicast endpoint probes are sent to.
pub fn multicast_endpoint() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(MULTICAST_ADDRESS), MULTICAST_PORT)
}

/// Build a probe message with a freshly generated message identifier.
///
/// The identifier is unique per call and exists only to make the request
/// well-formed; replies are never matched against it.
pub fn new_probe_message() -> Vec<u8> {
    let message_id = Uuid::new_v4();

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<e:Envelope xmlns:e="http://www.w3.org/2003/05/soap-envelope""#,
            r#" xmlns:w="http://schemas.xmlsoap.org/ws/2004/08/addressing""#,
            r#" xmlns:d="http://schemas.xmlsoap.org/ws/2005/04/discovery""#,
            r#" xmlns:dn="http://www.onvif.org/ver10/network/wsdl">"#,
            r#"<e:Header>"#,
            r#"<w:MessageID>urn:uuid:{}</w:MessageID>"#,
            r#"<w:To e:mustUnderstand="true">urn:schemas-xmlsoap-org:ws:2005:04:discovery</w:To>"#,
            r#"<w:Action e:mustUnderstand="true">http://schemas.xmlsoap.org/ws/2005/04/discovery/Probe</w:Action>"#,
            r#"</e:Header>"#,
            r#"<e:Body>"#,
            r#"<d:Probe>"#,
            r#"<d:Types>dn:NetworkVideoTransmitter</d:Types>"#,
            r#"</d:Probe>"#,
            r#"</e:Body>"#,
            r#"</e:Envelope>"#,
        ),
        message_id
    )
    .into_bytes()
}
