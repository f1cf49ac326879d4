//! Speech options for the v3 gRPC API.

use serde::{Deserialize, Serialize};

use super::request::Request;
use crate::error::Result;
use crate::types::{AudioFormat, Emotion, SampleRate, Voice, validate_speed};

/// A single synthesis setting applied to a [`Request`].
///
/// Later options of the same kind override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechOption {
    Voice(Voice),
    /// Sent as the `role` hint.
    Emotion(Emotion),
    /// Speaking speed in `[0.1, 3.0]`.
    Speed(f64),
    /// Output format. Required for every v3 call.
    OutputFormat(AudioFormat),
    /// Output sample rate, used by `lpcm` output.
    SampleRate(SampleRate),
}

impl SpeechOption {
    pub fn voice(voice: Voice) -> Self {
        SpeechOption::Voice(voice)
    }

    pub fn emotion(emotion: Emotion) -> Self {
        SpeechOption::Emotion(emotion)
    }

    pub fn speed(speed: f64) -> Self {
        SpeechOption::Speed(speed)
    }

    pub fn output_format(format: AudioFormat) -> Self {
        SpeechOption::OutputFormat(format)
    }

    pub fn sample_rate(rate: SampleRate) -> Self {
        SpeechOption::SampleRate(rate)
    }

    /// Applies the option to `request`.
    ///
    /// On error the request is left unchanged.
    pub fn apply(&self, request: &mut Request) -> Result<()> {
        match *self {
            SpeechOption::Voice(voice) => request.voice = Some(voice),
            SpeechOption::Emotion(emotion) => request.emotion = Some(emotion),
            SpeechOption::Speed(speed) => request.speed = Some(validate_speed(speed)?),
            SpeechOption::OutputFormat(format) => request.output_format = Some(format),
            SpeechOption::SampleRate(rate) => request.sample_rate = Some(rate),
        }
        Ok(())
    }
}
