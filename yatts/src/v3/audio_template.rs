//! Template based synthesis.
//!
//! A template pairs a reference recording with its transcript. Variables in
//! the transcript (`{name}`) are re-synthesized with new values while the
//! rest of the recording is kept.

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;

use super::proto;
use super::request::audio_format_options;
use crate::error::Result;
use crate::types::{AudioFormat, SampleRate};

/// Where a variable sits in the reference audio, and what it says there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioVariable {
    /// Text spoken for the variable in the reference audio.
    pub value: String,
    /// Offset of the variable from the start of the reference audio.
    pub start: Duration,
    /// Duration of the variable in the reference audio.
    pub length: Duration,
}

impl AudioVariable {
    pub fn new(value: impl Into<String>, start: Duration, length: Duration) -> Self {
        Self {
            value: value.into(),
            start,
            length,
        }
    }
}

/// Reference audio plus a text template with variables.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use giztoy_yatts::AudioFormat;
/// use giztoy_yatts::v3::{AudioTemplate, AudioVariable};
///
/// # let wav = vec![0u8; 16];
/// let template = AudioTemplate::new("Hello, {name}!", wav, AudioFormat::Wav)
///     .default_variable(
///         "name",
///         AudioVariable::new("Alice", Duration::from_millis(600), Duration::from_millis(400)),
///     )
///     .text_variable("name", "Bob");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTemplate {
    text_template: String,
    text_variables: BTreeMap<String, String>,
    default_variables: BTreeMap<String, AudioVariable>,
    audio_source: Bytes,
    audio_format: AudioFormat,
    audio_sample_rate: Option<SampleRate>,
}

impl AudioTemplate {
    /// Creates a template from its transcript and reference audio.
    pub fn new(
        text_template: impl Into<String>,
        audio_source: impl Into<Bytes>,
        audio_format: AudioFormat,
    ) -> Self {
        Self {
            text_template: text_template.into(),
            text_variables: BTreeMap::new(),
            default_variables: BTreeMap::new(),
            audio_source: audio_source.into(),
            audio_format,
            audio_sample_rate: None,
        }
    }

    /// Sets the sample rate of raw (`lpcm`) reference audio.
    pub fn sample_rate(mut self, rate: SampleRate) -> Self {
        self.audio_sample_rate = Some(rate);
        self
    }

    /// Sets the value to synthesize for a variable.
    pub fn text_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text_variables.insert(name.into(), value.into());
        self
    }

    /// Describes a variable as it occurs in the reference audio.
    pub fn default_variable(mut self, name: impl Into<String>, variable: AudioVariable) -> Self {
        self.default_variables.insert(name.into(), variable);
        self
    }

    pub fn text(&self) -> &str {
        &self.text_template
    }

    pub fn text_variables(&self) -> &BTreeMap<String, String> {
        &self.text_variables
    }

    pub fn default_variables(&self) -> &BTreeMap<String, AudioVariable> {
        &self.default_variables
    }

    pub fn audio_source(&self) -> &Bytes {
        &self.audio_source
    }

    pub fn audio_format(&self) -> AudioFormat {
        self.audio_format
    }

    pub fn audio_sample_rate(&self) -> Option<SampleRate> {
        self.audio_sample_rate
    }

    /// The utterance: template text with the requested variable values.
    pub(crate) fn text_template(&self) -> proto::TextTemplate {
        proto::TextTemplate {
            text_template: self.text_template.clone(),
            variables: self
                .text_variables
                .iter()
                .map(|(name, value)| proto::TextVariable {
                    variable_name: name.clone(),
                    variable_value: value.clone(),
                })
                .collect(),
        }
    }

    /// The hint carrying the reference audio and its transcript.
    ///
    /// The audio spec describes the reference audio, not the output.
    pub(crate) fn hint(&self) -> Result<proto::Hints> {
        let mut text_variables = Vec::with_capacity(self.default_variables.len());
        let mut audio_variables = Vec::with_capacity(self.default_variables.len());

        for (name, variable) in &self.default_variables {
            text_variables.push(proto::TextVariable {
                variable_name: name.clone(),
                variable_value: variable.value.clone(),
            });
            audio_variables.push(proto::AudioVariable {
                variable_name: name.clone(),
                variable_start_ms: millis(variable.start),
                variable_length_ms: millis(variable.length),
            });
        }

        let audio = proto::AudioContent {
            audio_source: Some(proto::audio_content::AudioSource::Content(
                self.audio_source.to_vec(),
            )),
            audio_spec: Some(audio_format_options(
                Some(self.audio_format),
                self.audio_sample_rate,
            )?),
        };

        Ok(proto::Hints {
            hint: Some(proto::hints::Hint::AudioTemplate(proto::AudioTemplate {
                audio: Some(audio),
                text_template: Some(proto::TextTemplate {
                    text_template: self.text_template.clone(),
                    variables: text_variables,
                }),
                variables: audio_variables,
            })),
        })
    }
}

fn millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
