//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};

/// ONVIF Scout - Command-line WS-Discovery for ONVIF devices
#[derive(Parser, Debug)]
#[command(name = "onvif-scout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover ONVIF devices on the network
    Discover(DiscoverArgs),
}

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Discovery timeout in seconds
    #[arg(short, long, default_value = "5", env = "ONVIF_SCOUT_TIMEOUT")]
    pub timeout: u64,

    /// Only show devices advertising a capability type containing this text
    #[arg(long)]
    pub filter_type: Option<String>,
}
