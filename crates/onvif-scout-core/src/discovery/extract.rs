//! Device record extraction from probe matches.

use std::net::IpAddr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ExtractError;
use crate::protocol::envelope::ProbeMatch;
use crate::types::DiscoveryDevice;

fn model_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"hardware/(\S*)").unwrap())
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"name/(\S*)").unwrap())
}

/// Split a space-separated field into its tokens.
///
/// Splits on whitespace runs, so tokens carry no surrounding whitespace
/// and order is preserved. No deduplication.
fn split_spaced_list(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// First capture after the marker, up to the next whitespace. Empty when
/// the marker does not occur in the scopes text.
fn scope_capture(re: &Regex, scopes: &str) -> String {
    re.captures(scopes)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Build a device record from one probe match and the reply's source.
///
/// A structurally incomplete match is an error so the caller can drop it
/// without affecting its siblings.
pub fn device_from_match(
    probe_match: ProbeMatch,
    source: IpAddr,
) -> Result<DiscoveryDevice, ExtractError> {
    let missing = |field| ExtractError::MissingField {
        address: source,
        field,
    };

    let xaddrs = probe_match.xaddrs.ok_or_else(|| missing("XAddrs"))?;
    let types = probe_match.types.ok_or_else(|| missing("Types"))?;
    let scopes = probe_match.scopes.ok_or_else(|| missing("Scopes"))?;

    Ok(DiscoveryDevice {
        address: source,
        xaddresses: split_spaced_list(&xaddrs),
        types: split_spaced_list(&types),
        model: scope_capture(model_regex(), &scopes),
        name: scope_capture(name_regex(), &scopes),
    })
}
