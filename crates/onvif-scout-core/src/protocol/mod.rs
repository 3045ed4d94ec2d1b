//! WS-Discovery protocol layer.
//!
//! This module handles building probe requests and parsing probe match responses.

pub mod envelope;
pub mod probe;
