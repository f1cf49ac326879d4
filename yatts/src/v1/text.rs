//! Speakable content for the v1 REST API.

use quick_xml::Reader;
use quick_xml::events::Event;

use super::request::{Request, Utterance};
use crate::error::{Error, Result};

/// Content to synthesize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEntity {
    /// Plain text.
    Text(String),
    /// SSML document whose root element is `<speak>`.
    Ssml(String),
}

impl TextEntity {
    /// Creates a plain text entity.
    pub fn text(text: impl Into<String>) -> Self {
        TextEntity::Text(text.into())
    }

    /// Creates an SSML entity.
    pub fn ssml(ssml: impl Into<String>) -> Self {
        TextEntity::Ssml(ssml.into())
    }

    /// Sets this entity as the request's utterance, replacing any previous one.
    ///
    /// On error the request is left unchanged.
    pub fn process(&self, request: &mut Request) -> Result<()> {
        let utterance = match self {
            TextEntity::Text(text) => {
                if text.is_empty() {
                    return Err(Error::EmptyContent);
                }
                Utterance::Text(text.clone())
            }
            TextEntity::Ssml(ssml) => {
                if ssml.is_empty() {
                    return Err(Error::EmptyContent);
                }
                if !is_speak_document(ssml) {
                    return Err(Error::InvalidMarkup);
                }
                Utterance::Ssml(ssml.clone())
            }
        };

        request.utterance = Some(utterance);
        Ok(())
    }
}

/// Reports whether `ssml` starts with a well-formed `<speak>` element.
///
/// Prolog items before the root are skipped. Anything after the root
/// element is not inspected.
fn is_speak_document(ssml: &str) -> bool {
    let mut reader = Reader::from_str(ssml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                return start.local_name().as_ref() == b"speak"
                    && reader.read_to_end(start.name()).is_ok();
            }
            Ok(Event::Empty(start)) => return start.local_name().as_ref() == b"speak",
            Ok(Event::Eof) | Ok(Event::End(_)) | Err(_) => return false,
            Ok(_) => {}
        }
    }
}
