//! SpeechKit v3 gRPC API.
//!
//! `UtteranceSynthesis` is a server-streaming call; audio chunks are
//! forwarded to the caller as they arrive.

mod audio_template;
mod client;
mod options;
mod request;
mod text;

/// Generated `speechkit.tts.v3` messages and service stubs.
#[allow(clippy::all, missing_docs)]
pub mod proto {
    tonic::include_proto!("speechkit.tts.v3");
}

pub use audio_template::{AudioTemplate, AudioVariable};
pub use client::{Client, ClientBuilder, DEFAULT_ENDPOINT};
pub use options::SpeechOption;
pub use request::{Request, TEMPLATE_MODEL};
pub use text::TextEntity;
