//! Error types for the ONVIF Scout CLI.
//!
//! CliError wraps DiscoveryError from the core library and adds CLI-specific variants.

use onvif_scout_core::error::DiscoveryError;
use thiserror::Error;

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const DECODE_ERROR: i32 = 3;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No devices found")]
    NoDevicesFound,
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Discovery(e) => match e {
                DiscoveryError::Transport(_) => exit_codes::NETWORK_ERROR,
                DiscoveryError::Decode(_) => exit_codes::DECODE_ERROR,
            },
            CliError::Io(_) => exit_codes::GENERAL_ERROR,
            CliError::NoDevicesFound => exit_codes::GENERAL_ERROR,
        }
    }
}
