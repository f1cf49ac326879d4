//! Yandex SpeechKit TTS SDK for Rust.
//!
//! This crate provides clients for both generations of the SpeechKit
//! text-to-speech API.
//!
//! # Features
//!
//! - v1: REST synthesis of plain text or SSML in a single `POST`
//! - v3: gRPC streaming synthesis of plain text or audio templates
//! - API key and IAM token authentication
//! - YAML configuration with environment overrides
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use giztoy_yatts::{ApiKeyAuth, AudioFormat, Voice};
//! use giztoy_yatts::v3::{Client, SpeechOption, TextEntity};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder(ApiKeyAuth::new("your-api-key"))
//!         .default_option(SpeechOption::voice(Voice::Alena))
//!         .default_option(SpeechOption::output_format(AudioFormat::OggOpus))
//!         .build()?;
//!
//!     let mut audio = client
//!         .speak(&TextEntity::text("Привет, мир!"), &[SpeechOption::speed(1.1)])
//!         .await?;
//!
//!     while let Some(chunk) = audio.next().await {
//!         println!("chunk: {} bytes", chunk?.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Authentication
//!
//! 1. API key:
//! ```rust,no_run
//! # use giztoy_yatts::ApiKeyAuth;
//! let auth = ApiKeyAuth::new("your-api-key");
//! ```
//!
//! 2. IAM token, fetched on every call:
//! ```rust,no_run
//! # use giztoy_yatts::IamTokenAuth;
//! let auth = IamTokenAuth::builder()
//!     .token_provider(|| Ok(std::env::var("IAM_TOKEN")?))
//!     .folder_id("b1g...")
//!     .build()?;
//! # Ok::<(), giztoy_yatts::Error>(())
//! ```

mod auth;
pub mod config;
mod error;
mod stream;
mod tts;
mod types;
pub mod v1;
pub mod v3;

pub use auth::{
    ApiKeyAuth, Authenticator, Credentials, FOLDER_ID_HEADER, IamTokenAuth, IamTokenAuthBuilder,
    TokenProvider,
};
pub use config::Config;
pub use error::{BoxError, Error, ErrorKind, Result};
pub use stream::AudioStream;
pub use tts::Tts;
pub use types::{AudioFormat, Emotion, Language, MAX_SPEED, MIN_SPEED, SampleRate, Voice};
