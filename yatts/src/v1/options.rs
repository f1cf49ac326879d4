//! Speech options for the v1 REST API.

use serde::{Deserialize, Serialize};

use super::request::Request;
use crate::error::Result;
use crate::types::{AudioFormat, Emotion, Language, SampleRate, Voice, validate_speed};

/// A single synthesis setting applied to a [`Request`].
///
/// Options are applied in order, so a later option of the same kind
/// overrides an earlier one. In YAML they are written as single-key maps:
///
/// ```yaml
/// - voice: alena
/// - speed: 1.2
/// - output_format: oggopus
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechOption {
    Language(Language),
    Voice(Voice),
    Emotion(Emotion),
    /// Speaking speed in `[0.1, 3.0]`.
    Speed(f64),
    OutputFormat(AudioFormat),
    SampleRate(SampleRate),
    /// Folder ID sent as the `folderId` form field. Empty means unset.
    FolderId(String),
}

impl SpeechOption {
    pub fn language(language: Language) -> Self {
        SpeechOption::Language(language)
    }

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

    pub fn folder_id(id: impl Into<String>) -> Self {
        SpeechOption::FolderId(id.into())
    }

    /// Applies the option to `request`.
    ///
    /// On error the request is left unchanged.
    pub fn apply(&self, request: &mut Request) -> Result<()> {
        match self {
            SpeechOption::Language(language) => request.language = Some(*language),
            SpeechOption::Voice(voice) => request.voice = Some(*voice),
            SpeechOption::Emotion(emotion) => request.emotion = Some(*emotion),
            SpeechOption::Speed(speed) => request.speed = Some(validate_speed(*speed)?),
            SpeechOption::OutputFormat(format) => request.output_format = Some(*format),
            SpeechOption::SampleRate(rate) => request.sample_rate = Some(*rate),
            SpeechOption::FolderId(id) => request.folder_id.clone_from(id),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_speed_out_of_range() {
        for speed in [0.01, 3.1, -1.0] {
            let mut r = Request::new();
            let err = SpeechOption::speed(speed).apply(&mut r).unwrap_err();
            assert!(matches!(err, Error::InvalidSpeed(_)));
            assert!(err.is_validation_error());
            assert_eq!(r, Request::new());
        }
    }

    #[test]
    fn test_speed_in_range() {
        for speed in [1.0, 1.5, 0.1, 3.0] {
            let mut r = Request::new();
            SpeechOption::speed(speed).apply(&mut r).unwrap();
            assert_eq!(r.speed(), Some(speed));
        }
    }

    #[test]
    fn test_failed_speed_keeps_previous_value() {
        let mut r = Request::new();
        SpeechOption::speed(1.5).apply(&mut r).unwrap();
        assert!(SpeechOption::speed(5.0).apply(&mut r).is_err());
        assert_eq!(r.speed(), Some(1.5));
    }

    #[test]
    fn test_assignments() {
        let mut r = Request::new();
        let options = [
            SpeechOption::language(Language::EnUs),
            SpeechOption::voice(Voice::John),
            SpeechOption::emotion(Emotion::Evil),
            SpeechOption::output_format(AudioFormat::Mp3),
            SpeechOption::sample_rate(SampleRate::Rate48000),
            SpeechOption::folder_id("b1g"),
        ];
        for option in &options {
            option.apply(&mut r).unwrap();
        }

        assert_eq!(r.language(), Some(Language::EnUs));
        assert_eq!(r.voice(), Some(Voice::John));
        assert_eq!(r.emotion(), Some(Emotion::Evil));
        assert_eq!(r.output_format(), Some(AudioFormat::Mp3));
        assert_eq!(r.sample_rate(), Some(SampleRate::Rate48000));
        assert_eq!(r.folder_id(), "b1g");
        assert_eq!(r.text(), None);
    }

    #[test]
    fn test_later_option_wins() {
        let mut r = Request::new();
        SpeechOption::voice(Voice::Alena).apply(&mut r).unwrap();
        SpeechOption::voice(Voice::Filipp).apply(&mut r).unwrap();
        assert_eq!(r.voice(), Some(Voice::Filipp));

        SpeechOption::folder_id("b1g").apply(&mut r).unwrap();
        SpeechOption::folder_id("").apply(&mut r).unwrap();
        assert_eq!(r.folder_id(), "");
    }

    #[test]
    fn test_yaml_options() {
        #[derive(Debug, Deserialize)]
        struct Defaults {
            #[serde(with = "serde_yaml::with::singleton_map_recursive")]
            defaults: Vec<SpeechOption>,
        }

        let yaml = "\
defaults:
  - voice: alena
  - speed: 1.2
  - output_format: oggopus
  - sample_rate: 16000
  - folder_id: b1g
";
        let parsed: Defaults = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(
            parsed.defaults,
            vec![
                SpeechOption::voice(Voice::Alena),
                SpeechOption::speed(1.2),
                SpeechOption::output_format(AudioFormat::OggOpus),
                SpeechOption::sample_rate(SampleRate::Rate16000),
                SpeechOption::folder_id("b1g"),
            ]
        );
    }
}
