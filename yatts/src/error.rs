//! Error types for the Yandex SpeechKit TTS client.

use thiserror::Error;

/// Result type alias for SpeechKit TTS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by token providers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid construction-time arguments.
    Config,
    /// A rejected option value.
    Validation,
    /// Empty, malformed or incomplete speakable content.
    Content,
    /// Credential retrieval failed.
    Auth,
    /// The call could not be issued or failed mid-stream.
    Transport,
}

/// Error type for SpeechKit TTS operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Speaking speed outside of `[0.1, 3.0]`.
    #[error("invalid speaking speed: {0}")]
    InvalidSpeed(f64),

    /// Unknown tag for one of the closed vocabularies.
    #[error("invalid {kind}: {value:?}")]
    InvalidValue { kind: &'static str, value: String },

    /// Empty text, SSML or audio source.
    #[error("empty text entry")]
    EmptyContent,

    /// SSML that does not parse or whose root is not `<speak>`.
    #[error("invalid SSML")]
    InvalidMarkup,

    /// Nothing to speak was set on the request.
    #[error("no text or ssml")]
    NoContent,

    /// Plain text synthesis without a voice.
    #[error("voice not specified")]
    VoiceNotSpecified,

    /// Streaming synthesis without an output format.
    #[error("output format not specified")]
    OutputFormatNotSpecified,

    /// Output format unknown or unsupported by the protocol.
    #[error("invalid output format: {0}")]
    InvalidOutputFormat(String),

    /// Credential retrieval or encoding failed.
    #[error("auth error: {0}")]
    Auth(String),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-OK HTTP status from the synthesis endpoint.
    #[error("unexpected status code: {status}: {message}")]
    Status { status: u16, message: String },

    /// gRPC status returned by the service.
    #[error("grpc error: {0}")]
    Grpc(#[from] tonic::Status),

    /// gRPC channel error.
    #[error("grpc transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Creates an error for an unknown vocabulary tag.
    pub fn invalid_value(kind: &'static str, value: impl Into<String>) -> Self {
        Error::InvalidValue {
            kind,
            value: value.into(),
        }
    }

    /// Returns the taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::Yaml(_) => ErrorKind::Config,
            Error::InvalidSpeed(_) | Error::InvalidValue { .. } => ErrorKind::Validation,
            Error::EmptyContent
            | Error::InvalidMarkup
            | Error::NoContent
            | Error::VoiceNotSpecified
            | Error::OutputFormatNotSpecified
            | Error::InvalidOutputFormat(_) => ErrorKind::Content,
            Error::Auth(_) => ErrorKind::Auth,
            Error::Http(_)
            | Error::Status { .. }
            | Error::Grpc(_)
            | Error::Transport(_)
            | Error::Io(_) => ErrorKind::Transport,
        }
    }

    /// Returns true if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        self.kind() == ErrorKind::Config
    }

    /// Returns true if an option value was rejected.
    pub fn is_validation_error(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Returns true if the speakable content was rejected.
    pub fn is_content_error(&self) -> bool {
        self.kind() == ErrorKind::Content
    }

    /// Returns true if this is an authentication error.
    ///
    /// Besides credential retrieval failures this also covers the
    /// service rejecting the credentials (HTTP 401/403, gRPC
    /// `UNAUTHENTICATED`/`PERMISSION_DENIED`).
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::Auth(_) => true,
            Error::Status { status, .. } => *status == 401 || *status == 403,
            Error::Grpc(status) => matches!(
                status.code(),
                tonic::Code::Unauthenticated | tonic::Code::PermissionDenied
            ),
            _ => false,
        }
    }

    /// Returns true if the call failed at the transport level.
    pub fn is_transport_error(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}
