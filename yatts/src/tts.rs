//! Protocol independent synthesis interface.

use async_trait::async_trait;

use crate::error::Result;
use crate::stream::AudioStream;
use crate::{v1, v3};

/// A text-to-speech client.
///
/// Implemented by both [`v1::Client`] and [`v3::Client`], each with its own
/// content and option types.
#[async_trait]
pub trait Tts: Send + Sync {
    /// Content accepted by [`Tts::speak`].
    type Entity: Send + Sync;
    /// Per-call option type.
    type SpeechOption: Send + Sync;

    /// Synthesizes `entity` with `options` applied after the client defaults.
    async fn speak(
        &self,
        entity: &Self::Entity,
        options: &[Self::SpeechOption],
    ) -> Result<AudioStream>;
}

#[async_trait]
impl Tts for v1::Client {
    type Entity = v1::TextEntity;
    type SpeechOption = v1::SpeechOption;

    async fn speak(
        &self,
        entity: &Self::Entity,
        options: &[Self::SpeechOption],
    ) -> Result<AudioStream> {
        v1::Client::speak(self, entity, options).await
    }
}

#[async_trait]
impl Tts for v3::Client {
    type Entity = v3::TextEntity;
    type SpeechOption = v3::SpeechOption;

    async fn speak(
        &self,
        entity: &Self::Entity,
        options: &[Self::SpeechOption],
    ) -> Result<AudioStream> {
        v3::Client::speak(self, entity, options).await
    }
}
