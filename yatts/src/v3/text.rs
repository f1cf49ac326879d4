//! Speakable content for the v3 gRPC API.

use super::audio_template::AudioTemplate;
use super::request::{Request, Utterance};
use crate::error::{Error, Result};

/// Content to synthesize.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEntity {
    /// Plain text. Requires a voice.
    Text(String),
    /// Template synthesis from reference audio.
    AudioTemplate(AudioTemplate),
}

impl TextEntity {
    /// Creates a plain text entity.
    pub fn text(text: impl Into<String>) -> Self {
        TextEntity::Text(text.into())
    }

    /// Creates a template entity.
    pub fn audio_template(template: AudioTemplate) -> Self {
        TextEntity::AudioTemplate(template)
    }

    /// Sets this entity as the request's utterance, replacing any previous one.
    ///
    /// On error the request is left unchanged.
    pub fn process(&self, request: &mut Request) -> Result<()> {
        let utterance = match self {
            TextEntity::Text(text) if text.is_empty() => return Err(Error::EmptyContent),
            TextEntity::Text(text) => Utterance::Text(text.clone()),
            TextEntity::AudioTemplate(template) if template.audio_source().is_empty() => {
                return Err(Error::EmptyContent);
            }
            TextEntity::AudioTemplate(template) => Utterance::Template(template.clone()),
        };

        request.utterance = Some(utterance);
        Ok(())
    }
}

impl From<AudioTemplate> for TextEntity {
    fn from(template: AudioTemplate) -> Self {
        TextEntity::AudioTemplate(template)
    }
}
