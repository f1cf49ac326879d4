//! Request state and form encoding for the v1 REST API.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::error::{Error, Result};
use crate::types::{AudioFormat, Emotion, Language, SampleRate, Voice};

/// What to speak. Text and SSML are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Utterance {
    Text(String),
    Ssml(String),
}

/// Accumulated v1 synthesis request.
///
/// Built by applying [`SpeechOption`](super::SpeechOption)s and a
/// [`TextEntity`](super::TextEntity), then encoded once with [`Request::body`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub(crate) utterance: Option<Utterance>,
    pub(crate) language: Option<Language>,
    pub(crate) voice: Option<Voice>,
    pub(crate) emotion: Option<Emotion>,
    pub(crate) speed: Option<f64>,
    pub(crate) sample_rate: Option<SampleRate>,
    pub(crate) output_format: Option<AudioFormat>,
    pub(crate) folder_id: String,
}

impl Request {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the plain text, if text is the current utterance.
    pub fn text(&self) -> Option<&str> {
        match self.utterance {
            Some(Utterance::Text(ref text)) => Some(text),
            _ => None,
        }
    }

    /// Returns the SSML, if SSML is the current utterance.
    pub fn ssml(&self) -> Option<&str> {
        match self.utterance {
            Some(Utterance::Ssml(ref ssml)) => Some(ssml),
            _ => None,
        }
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn voice(&self) -> Option<Voice> {
        self.voice
    }

    pub fn emotion(&self) -> Option<Emotion> {
        self.emotion
    }

    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    pub fn sample_rate(&self) -> Option<SampleRate> {
        self.sample_rate
    }

    pub fn output_format(&self) -> Option<AudioFormat> {
        self.output_format
    }

    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// Encodes the request as an `application/x-www-form-urlencoded` body.
    ///
    /// Keys are emitted in alphabetical order and unset fields are omitted.
    /// Emotion is held as request state only and never sent.
    pub fn body(&self) -> Result<String> {
        let mut fields = BTreeMap::new();

        match self.utterance {
            Some(Utterance::Text(ref text)) => fields.insert("text", text.clone()),
            Some(Utterance::Ssml(ref ssml)) => fields.insert("ssml", ssml.clone()),
            None => return Err(Error::NoContent),
        };

        if let Some(language) = self.language {
            fields.insert("lang", language.as_str().to_string());
        }
        if let Some(voice) = self.voice {
            fields.insert("voice", voice.as_str().to_string());
        }
        if let Some(speed) = self.speed {
            fields.insert("speed", format!("{speed:.1}"));
        }
        if let Some(sample_rate) = self.sample_rate {
            fields.insert("sampleRateHertz", sample_rate.hertz().to_string());
        }
        if !self.folder_id.is_empty() {
            fields.insert("folderId", self.folder_id.clone());
        }
        if let Some(format) = self.output_format {
            fields.insert("format", legacy_format(format)?.to_string());
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(fields);
        Ok(serializer.finish())
    }
}

/// The v1 API knows no WAV output.
fn legacy_format(format: AudioFormat) -> Result<&'static str> {
    match format {
        AudioFormat::Lpcm | AudioFormat::OggOpus | AudioFormat::Mp3 => Ok(format.as_str()),
        AudioFormat::Wav => Err(Error::InvalidOutputFormat(format.as_str().to_string())),
    }
}
