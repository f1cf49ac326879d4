//! Request state and payload building for the v3 gRPC API.

use super::audio_template::AudioTemplate;
use super::proto;
use super::proto::{hints::Hint, utterance_synthesis_request::Utterance as ProtoUtterance};
use crate::error::{Error, Result};
use crate::types::{AudioFormat, Emotion, SampleRate, Voice};

/// Model requested for template synthesis.
pub const TEMPLATE_MODEL: &str = "zsl";

/// What to speak. Text and template are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Utterance {
    Text(String),
    Template(AudioTemplate),
}

/// Accumulated v3 synthesis request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub(crate) utterance: Option<Utterance>,
    pub(crate) voice: Option<Voice>,
    pub(crate) emotion: Option<Emotion>,
    pub(crate) speed: Option<f64>,
    pub(crate) sample_rate: Option<SampleRate>,
    pub(crate) output_format: Option<AudioFormat>,
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

    /// Returns the template, if a template is the current utterance.
    pub fn audio_template(&self) -> Option<&AudioTemplate> {
        match self.utterance {
            Some(Utterance::Template(ref template)) => Some(template),
            _ => None,
        }
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

    /// Builds the `UtteranceSynthesis` payload.
    ///
    /// Text requires a voice. Every request requires an output format.
    ///
    /// Hint order for text is voice, speed, role; speed and role are sent
    /// only when set. Template requests carry the template hint followed by
    /// a role hint that is always present, empty when no emotion is set.
    pub fn build(&self) -> Result<proto::UtteranceSynthesisRequest> {
        let mut payload = proto::UtteranceSynthesisRequest::default();

        match self.utterance {
            Some(Utterance::Text(ref text)) => {
                let voice = self.voice.ok_or(Error::VoiceNotSpecified)?;
                payload.utterance = Some(ProtoUtterance::Text(text.clone()));
                payload.hints.push(hint(Hint::Voice(voice.as_str().to_string())));
                if let Some(speed) = self.speed {
                    payload.hints.push(hint(Hint::Speed(speed)));
                }
                if let Some(emotion) = self.emotion {
                    payload.hints.push(hint(Hint::Role(emotion.as_str().to_string())));
                }
            }
            Some(Utterance::Template(ref template)) => {
                payload.model = TEMPLATE_MODEL.to_string();
                payload.utterance = Some(ProtoUtterance::TextTemplate(template.text_template()));
                payload.hints.push(template.hint()?);
                let role = self.emotion.map(|e| e.as_str()).unwrap_or_default();
                payload.hints.push(hint(Hint::Role(role.to_string())));
            }
            None => return Err(Error::NoContent),
        }

        payload.output_audio_spec =
            Some(audio_format_options(self.output_format, self.sample_rate)?);
        Ok(payload)
    }
}

fn hint(hint: Hint) -> proto::Hints {
    proto::Hints { hint: Some(hint) }
}

/// Resolves an audio spec.
///
/// `lpcm` becomes raw 16-bit PCM at `sample_rate` (0 lets the service pick);
/// the others become container audio, for which the rate does not apply.
pub(crate) fn audio_format_options(
    format: Option<AudioFormat>,
    sample_rate: Option<SampleRate>,
) -> Result<proto::AudioFormatOptions> {
    use proto::audio_format_options::AudioFormat as Spec;
    use proto::container_audio::ContainerAudioType;

    let container = |kind: ContainerAudioType| {
        Spec::ContainerAudio(proto::ContainerAudio {
            container_audio_type: kind as i32,
        })
    };

    let spec = match format.ok_or(Error::OutputFormatNotSpecified)? {
        AudioFormat::Lpcm => Spec::RawAudio(proto::RawAudio {
            audio_encoding: proto::raw_audio::AudioEncoding::Linear16Pcm as i32,
            sample_rate_hertz: sample_rate.map(|r| i64::from(r.hertz())).unwrap_or_default(),
        }),
        AudioFormat::Wav => container(ContainerAudioType::Wav),
        AudioFormat::OggOpus => container(ContainerAudioType::OggOpus),
        AudioFormat::Mp3 => container(ContainerAudioType::Mp3),
    };

    Ok(proto::AudioFormatOptions {
        audio_format: Some(spec),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto::audio_format_options::AudioFormat as Spec;

    fn text_request() -> Request {
        Request {
            utterance: Some(Utterance::Text("hello".to_string())),
            voice: Some(Voice::Alena),
            output_format: Some(AudioFormat::OggOpus),
            ..Default::default()
        }
    }

    fn template_request() -> Request {
        Request {
            utterance: Some(Utterance::Template(AudioTemplate::new(
                "Hello, {name}",
                vec![7u8; 4],
                AudioFormat::Wav,
            ))),
            output_format: Some(AudioFormat::Lpcm),
            sample_rate: Some(SampleRate::Rate48000),
            ..Default::default()
        }
    }

    fn roles(payload: &proto::UtteranceSynthesisRequest) -> Vec<String> {
        payload
            .hints
            .iter()
            .filter_map(|h| match h.hint {
                Some(Hint::Role(ref role)) => Some(role.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_build_without_content() {
        let r = Request {
            voice: Some(Voice::Alena),
            output_format: Some(AudioFormat::Mp3),
            ..Default::default()
        };
        assert!(matches!(r.build(), Err(Error::NoContent)));
    }

    #[test]
    fn test_build_text_without_voice() {
        let r = Request {
            voice: None,
            ..text_request()
        };
        assert!(matches!(r.build(), Err(Error::VoiceNotSpecified)));
    }

    #[test]
    fn test_build_without_output_format() {
        let r = Request {
            output_format: None,
            ..text_request()
        };
        assert!(matches!(r.build(), Err(Error::OutputFormatNotSpecified)));
    }

    #[test]
    fn test_unrecognized_format_tag() {
        let err = "flac".parse::<AudioFormat>().unwrap_err();
        assert!(matches!(err, Error::InvalidOutputFormat(ref tag) if tag == "flac"));
        assert!(err.is_content_error());
    }

    #[test]
    fn test_build_text() {
        let r = Request {
            speed: Some(1.4),
            emotion: Some(Emotion::Good),
            ..text_request()
        };
        let payload = r.build().unwrap();

        assert_eq!(payload.model, "");
        assert_eq!(payload.utterance, Some(ProtoUtterance::Text("hello".to_string())));
        assert_eq!(
            payload.hints,
            vec![
                hint(Hint::Voice("alena".to_string())),
                hint(Hint::Speed(1.4)),
                hint(Hint::Role("good".to_string())),
            ]
        );
        assert_eq!(
            payload.output_audio_spec.unwrap().audio_format,
            Some(Spec::ContainerAudio(proto::ContainerAudio {
                container_audio_type: proto::container_audio::ContainerAudioType::OggOpus as i32,
            }))
        );
    }

    #[test]
    fn test_text_role_hint_only_when_emotion_set() {
        let payload = text_request().build().unwrap();
        assert!(roles(&payload).is_empty());
        assert_eq!(payload.hints.len(), 1);
    }

    #[test]
    fn test_template_role_hint_always_present() {
        // Template requests keep sending an empty role while text requests omit it.
        let payload = template_request().build().unwrap();
        assert_eq!(roles(&payload), vec![String::new()]);

        let payload = Request {
            emotion: Some(Emotion::Strict),
            ..template_request()
        }
        .build()
        .unwrap();
        assert_eq!(roles(&payload), vec!["strict".to_string()]);
    }

    #[test]
    fn test_build_template() {
        let payload = template_request().build().unwrap();

        assert_eq!(payload.model, TEMPLATE_MODEL);
        assert!(matches!(
            payload.utterance,
            Some(ProtoUtterance::TextTemplate(ref tt)) if tt.text_template == "Hello, {name}"
        ));
        assert!(matches!(
            payload.hints[0].hint,
            Some(Hint::AudioTemplate(_))
        ));

        // The outer format governs the output, the template's own the reference audio.
        assert_eq!(
            payload.output_audio_spec.unwrap().audio_format,
            Some(Spec::RawAudio(proto::RawAudio {
                audio_encoding: proto::raw_audio::AudioEncoding::Linear16Pcm as i32,
                sample_rate_hertz: 48000,
            }))
        );
    }

    #[test]
    fn test_template_does_not_require_voice() {
        assert!(template_request().voice.is_none());
        assert!(template_request().build().is_ok());
    }

    #[test]
    fn test_lpcm_without_sample_rate() {
        let spec = audio_format_options(Some(AudioFormat::Lpcm), None).unwrap();
        assert!(matches!(
            spec.audio_format,
            Some(Spec::RawAudio(ref raw)) if raw.sample_rate_hertz == 0
        ));
    }

    #[test]
    fn test_container_formats_ignore_sample_rate() {
        for (format, kind) in [
            (AudioFormat::Wav, proto::container_audio::ContainerAudioType::Wav),
            (AudioFormat::Mp3, proto::container_audio::ContainerAudioType::Mp3),
        ] {
            let spec = audio_format_options(Some(format), Some(SampleRate::Rate8000)).unwrap();
            assert_eq!(
                spec.audio_format,
                Some(Spec::ContainerAudio(proto::ContainerAudio {
                    container_audio_type: kind as i32,
                }))
            );
        }
    }
}
