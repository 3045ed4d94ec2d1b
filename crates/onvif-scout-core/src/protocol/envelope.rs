//! Probe response envelope parsing.
//!
//! Replies are SOAP envelopes whose body lists zero or more probe matches.
//! Parsing is namespace-agnostic: devices disagree on prefixes, so elements
//! are matched by local name only.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::DecodeError;

/// One device's self-description within a reply envelope.
///
/// Fields hold the raw space-separated text of the corresponding elements.
/// `None` means the element was absent from the match; an element that is
/// present but empty yields `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeMatch {
    pub xaddrs: Option<String>,
    pub types: Option<String>,
    pub scopes: Option<String>,
}

fn init_field(current: &mut ProbeMatch, element: &str) {
    match element {
        "XAddrs" => current.xaddrs = Some(String::new()),
        "Types" => current.types = Some(String::new()),
        "Scopes" => current.scopes = Some(String::new()),
        _ => {}
    }
}

fn append_field(current: &mut ProbeMatch, element: &str, text: &str) {
    let field = match element {
        "XAddrs" => current.xaddrs.as_mut(),
        "Types" => current.types.as_mut(),
        "Scopes" => current.scopes.as_mut(),
        _ => None,
    };
    if let Some(value) = field {
        value.push_str(text);
    }
}

/// Parse a reply payload into its list of probe matches.
///
/// The root element must be an `Envelope`; anything else, or any XML-level
/// failure, aborts the whole decode. A valid envelope with no matches
/// returns an empty list.
pub fn parse_probe_response(xml: &str) -> Result<Vec<ProbeMatch>, DecodeError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut matches = Vec::new();
    let mut current: Option<ProbeMatch> = None;
    let mut current_element = String::new();
    let mut saw_root = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();

                if !saw_root {
                    if name != "Envelope" {
                        return Err(DecodeError::UnexpectedRoot(name));
                    }
                    saw_root = true;
                } else if name == "ProbeMatch" {
                    current = Some(ProbeMatch::default());
                } else if let Some(m) = current.as_mut() {
                    init_field(m, &name);
                }

                current_element = name;
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();

                if !saw_root {
                    if name != "Envelope" {
                        return Err(DecodeError::UnexpectedRoot(name));
                    }
                    saw_root = true;
                } else if let Some(m) = current.as_mut() {
                    init_field(m, &name);
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                if let Some(m) = current.as_mut() {
                    append_field(m, &current_element, &text);
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"ProbeMatch" {
                    if let Some(m) = current.take() {
                        matches.push(m);
                    }
                }
                current_element.clear();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(DecodeError::MissingEnvelope);
    }

    Ok(matches)
}
