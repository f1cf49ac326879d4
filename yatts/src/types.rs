//! Common types for the SpeechKit TTS API.
//!
//! Voice details: <https://cloud.yandex.ru/docs/speechkit/tts/voices>

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Slowest speaking speed accepted by the service.
pub const MIN_SPEED: f64 = 0.1;

/// Fastest speaking speed accepted by the service.
pub const MAX_SPEED: f64 = 3.0;

/// Checks that an explicitly set speed lies in `[MIN_SPEED, MAX_SPEED]`.
pub(crate) fn validate_speed(speed: f64) -> Result<f64> {
    if (MIN_SPEED..=MAX_SPEED).contains(&speed) {
        Ok(speed)
    } else {
        Err(Error::InvalidSpeed(speed))
    }
}

// ================== Language ==================

/// Synthesis language (v1 API only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// Russian
    #[serde(rename = "ru-RU")]
    RuRu,
    /// English (US)
    #[serde(rename = "en-US")]
    EnUs,
    /// Kazakh
    #[serde(rename = "kk-KK")]
    KkKk,
    /// German
    #[serde(rename = "de-DE")]
    DeDe,
    /// Uzbek
    #[serde(rename = "uz-UZ")]
    UzUz,
}

impl Language {
    /// All supported languages.
    pub const ALL: &'static [Language] = &[
        Language::RuRu,
        Language::EnUs,
        Language::KkKk,
        Language::DeDe,
        Language::UzUz,
    ];

    /// Returns the language code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::RuRu => "ru-RU",
            Language::EnUs => "en-US",
            Language::KkKk => "kk-KK",
            Language::DeDe => "de-DE",
            Language::UzUz => "uz-UZ",
        }
    }
}

// ================== Voice ==================

/// Speaker voice.
///
/// `MadiRus` is the v1 spelling of the Russian-speaking Madi voice,
/// `MadiRu` is the v3 one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Voice {
    Oksana,
    Jane,
    Omazh,
    Zahar,
    Ermil,
    Alena,
    Filipp,
    Amira,
    Madi,
    #[serde(rename = "madirus")]
    MadiRus,
    MadiRu,
    Nigora,
    Lea,
    John,
    Saule,
    Zhanar,
    Dasha,
    Julia,
    Lera,
    Masha,
    Marina,
    Alexander,
    Kirill,
    Anton,
    SauleRu,
    ZamiraRu,
    ZhanarRu,
    YulduzRu,
    Zamira,
    Yulduz,
}

impl Voice {
    /// All known voices.
    pub const ALL: &'static [Voice] = &[
        Voice::Oksana,
        Voice::Jane,
        Voice::Omazh,
        Voice::Zahar,
        Voice::Ermil,
        Voice::Alena,
        Voice::Filipp,
        Voice::Amira,
        Voice::Madi,
        Voice::MadiRus,
        Voice::MadiRu,
        Voice::Nigora,
        Voice::Lea,
        Voice::John,
        Voice::Saule,
        Voice::Zhanar,
        Voice::Dasha,
        Voice::Julia,
        Voice::Lera,
        Voice::Masha,
        Voice::Marina,
        Voice::Alexander,
        Voice::Kirill,
        Voice::Anton,
        Voice::SauleRu,
        Voice::ZamiraRu,
        Voice::ZhanarRu,
        Voice::YulduzRu,
        Voice::Zamira,
        Voice::Yulduz,
    ];

    /// Returns the voice name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Oksana => "oksana",
            Voice::Jane => "jane",
            Voice::Omazh => "omazh",
            Voice::Zahar => "zahar",
            Voice::Ermil => "ermil",
            Voice::Alena => "alena",
            Voice::Filipp => "filipp",
            Voice::Amira => "amira",
            Voice::Madi => "madi",
            Voice::MadiRus => "madirus",
            Voice::MadiRu => "madi_ru",
            Voice::Nigora => "nigora",
            Voice::Lea => "lea",
            Voice::John => "john",
            Voice::Saule => "saule",
            Voice::Zhanar => "zhanar",
            Voice::Dasha => "dasha",
            Voice::Julia => "julia",
            Voice::Lera => "lera",
            Voice::Masha => "masha",
            Voice::Marina => "marina",
            Voice::Alexander => "alexander",
            Voice::Kirill => "kirill",
            Voice::Anton => "anton",
            Voice::SauleRu => "saule_ru",
            Voice::ZamiraRu => "zamira_ru",
            Voice::ZhanarRu => "zhanar_ru",
            Voice::YulduzRu => "yulduz_ru",
            Voice::Zamira => "zamira",
            Voice::Yulduz => "yulduz",
        }
    }
}

// ================== Emotion ==================

/// Emotional coloring of the voice (the `role` hint in v3).
///
/// The absence of an emotion is modelled as `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Good,
    Evil,
    Whisper,
    Friendly,
    Strict,
}

impl Emotion {
    /// All known emotions.
    pub const ALL: &'static [Emotion] = &[
        Emotion::Neutral,
        Emotion::Good,
        Emotion::Evil,
        Emotion::Whisper,
        Emotion::Friendly,
        Emotion::Strict,
    ];

    /// Returns the emotion as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Good => "good",
            Emotion::Evil => "evil",
            Emotion::Whisper => "whisper",
            Emotion::Friendly => "friendly",
            Emotion::Strict => "strict",
        }
    }
}

// ================== Audio Format ==================

/// Synthesized audio format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// Raw linear 16-bit PCM
    Lpcm,
    /// OGG container with Opus codec
    OggOpus,
    /// MP3
    Mp3,
    /// WAV container (v3 only)
    Wav,
}

impl AudioFormat {
    /// All known formats.
    pub const ALL: &'static [AudioFormat] = &[
        AudioFormat::Lpcm,
        AudioFormat::OggOpus,
        AudioFormat::Mp3,
        AudioFormat::Wav,
    ];

    /// Returns the format as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Lpcm => "lpcm",
            AudioFormat::OggOpus => "oggopus",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }
}

// ================== Sample Rate ==================

/// Output sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
pub enum SampleRate {
    /// 8000 Hz
    Rate8000 = 8000,
    /// 16000 Hz
    Rate16000 = 16000,
    /// 48000 Hz
    Rate48000 = 48000,
}

impl SampleRate {
    /// Returns the sample rate in hertz.
    pub fn hertz(&self) -> u32 {
        *self as u32
    }
}

impl From<SampleRate> for u32 {
    fn from(rate: SampleRate) -> Self {
        rate.hertz()
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = Error;

    fn try_from(hertz: u32) -> Result<Self> {
        match hertz {
            8000 => Ok(SampleRate::Rate8000),
            16000 => Ok(SampleRate::Rate16000),
            48000 => Ok(SampleRate::Rate48000),
            other => Err(Error::invalid_value("sample rate", other.to_string())),
        }
    }
}

// ================== Parsing & Display ==================

macro_rules! impl_tag {
    ($ty:ty, $err:expr) => {
        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| $err(s))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_tag!(Language, |s: &str| Error::invalid_value("language", s));
impl_tag!(Voice, |s: &str| Error::invalid_value("voice", s));
impl_tag!(Emotion, |s: &str| Error::invalid_value("emotion", s));
impl_tag!(AudioFormat, |s: &str| {
    Error::InvalidOutputFormat(s.to_string())
});

impl FromStr for SampleRate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hertz: u32 = s
            .parse()
            .map_err(|_| Error::invalid_value("sample rate", s))?;
        SampleRate::try_from(hertz)
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hertz())
    }
}
