//! Error types for ONVIF Scout core.

use std::net::IpAddr;

use thiserror::Error;

/// Core error type for discovery operations.
///
/// A `discover` call either returns a device list or one of these; there
/// is no partial-success channel.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Malformed probe response: {0}")]
    Decode(#[from] DecodeError),
}

/// Probe response decoding errors.
///
/// Any of these fails the whole reply batch, including replies that were
/// received (or even decoded) earlier.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Expected an Envelope root element, found <{0}>")]
    UnexpectedRoot(String),

    #[error("Payload contains no XML envelope")]
    MissingEnvelope,
}

/// Per-match extraction errors.
///
/// Unlike [`DecodeError`], these never fail the batch: the offending match
/// is dropped with a diagnostic and its siblings are still returned.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Probe match from {address} is missing {field}")]
    MissingField {
        address: IpAddr,
        field: &'static str,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;
