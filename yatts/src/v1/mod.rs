//! SpeechKit v1 REST API.
//!
//! One `POST` per utterance with a form-encoded body; the response body is
//! the synthesized audio.

mod client;
mod options;
mod request;
mod text;

pub use client::{Client, ClientBuilder, DEFAULT_ENDPOINT};
pub use options::SpeechOption;
pub use request::Request;
pub use text::TextEntity;
