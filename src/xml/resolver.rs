use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{ROOT_ELEMENT, ns};
use crate::core::{OrderError, Profile, ProfileDescriptor};

/// Determine the profile of an Order-X document without parsing it fully.
///
/// The root element must be `SCRDMCCBDACIOMessageStructure` in the Order-X
/// namespace, otherwise [`OrderError::UnknownXmlContent`]. The guideline URN
/// under `ExchangedDocumentContext` selects the profile; a missing or
/// unknown URN yields [`OrderError::UnknownProfile`].
pub fn resolve(xml: &str) -> Result<(Profile, &'static ProfileDescriptor), OrderError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut root_checked = false;
    let mut guideline = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if !root_checked {
                    check_root(e)?;
                    root_checked = true;
                }
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                path.push(name);
            }
            Ok(Event::Empty(ref e)) if !root_checked => {
                check_root(e)?;
                break;
            }
            Ok(Event::Text(ref e)) => {
                if is_guideline_id(&path) {
                    let text = e.unescape().unwrap_or_default();
                    guideline.push_str(&text);
                }
            }
            Ok(Event::End(_)) => {
                if is_guideline_id(&path) {
                    break;
                }
                // The context precedes the header; nothing after it matters.
                if path.pop().as_deref() == Some("ExchangedDocumentContext") {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(_) if !root_checked => return Err(OrderError::UnknownXmlContent),
            Err(e) => return Err(OrderError::Xml(format!("XML parse error: {e}"))),
            _ => {}
        }
    }

    if !root_checked {
        return Err(OrderError::UnknownXmlContent);
    }

    let profile = Profile::from_urn(&guideline).ok_or_else(OrderError::unknown_profile_content)?;
    log::debug!("resolved Order-X profile {} from guideline '{}'", profile, guideline.trim());
    Ok((profile, profile.descriptor()))
}

/// Numeric id of the document's profile.
pub fn resolve_profile_id(xml: &str) -> Result<u8, OrderError> {
    resolve(xml).map(|(p, _)| p.id())
}

/// Descriptor of the document's profile.
pub fn resolve_profile_def(xml: &str) -> Result<&'static ProfileDescriptor, OrderError> {
    resolve(xml).map(|(_, d)| d)
}

fn is_guideline_id(path: &[String]) -> bool {
    path.len() == 4
        && path[1] == "ExchangedDocumentContext"
        && path[2] == "GuidelineSpecifiedDocumentContextParameter"
        && path[3] == "ID"
}

/// Root local name must match and its prefix must be bound to the Order-X
/// namespace on the root element itself.
fn check_root(e: &BytesStart<'_>) -> Result<(), OrderError> {
    if e.local_name().as_ref() != ROOT_ELEMENT.as_bytes() {
        return Err(OrderError::UnknownXmlContent);
    }
    let binding = match e.name().prefix() {
        Some(prefix) => {
            let mut key = b"xmlns:".to_vec();
            key.extend_from_slice(prefix.as_ref());
            key
        }
        None => b"xmlns".to_vec(),
    };
    let bound = e
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == binding.as_slice())
        .map(|a| a.value.into_owned());
    match bound {
        Some(uri) if uri == ns::RSM.as_bytes() => Ok(()),
        _ => Err(OrderError::UnknownXmlContent),
    }
}
