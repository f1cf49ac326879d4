//! Client for the v3 gRPC synthesizer.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tonic::Streaming;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::{debug, error};

use super::options::SpeechOption;
use super::proto::{self, UtteranceSynthesisResponse, synthesizer_client::SynthesizerClient};
use super::request::Request;
use super::text::TextEntity;
use crate::auth::Authenticator;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::stream::AudioStream;

/// Default v3 synthesizer endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://tts.api.cloud.yandex.net:443";

/// Audio chunks buffered between the receive task and the reader.
const CHUNK_BUFFER: usize = 16;

/// SpeechKit v3 client.
///
/// The channel connects lazily on the first call, so building a client
/// never touches the network. It must be built inside a Tokio runtime.
///
/// # Example
///
/// ```rust,no_run
/// use giztoy_yatts::{ApiKeyAuth, AudioFormat, Voice};
/// use giztoy_yatts::v3::{Client, SpeechOption, TextEntity};
///
/// # async fn run() -> giztoy_yatts::Result<()> {
/// let client = Client::builder(ApiKeyAuth::new("your-api-key"))
///     .default_option(SpeechOption::output_format(AudioFormat::OggOpus))
///     .build()?;
///
/// let audio = client
///     .speak(&TextEntity::text("Привет!"), &[SpeechOption::voice(Voice::Alena)])
///     .await?
///     .collect_bytes()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: SynthesizerClient<Channel>,
    endpoint: String,
    auth: Arc<dyn Authenticator>,
    defaults: Arc<Vec<SpeechOption>>,
}

impl Client {
    /// Creates a new client builder.
    pub fn builder(auth: impl Authenticator + 'static) -> ClientBuilder {
        ClientBuilder::new(auth)
    }

    /// Returns the synthesizer endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the options applied before every call's own options.
    pub fn default_options(&self) -> &[SpeechOption] {
        &self.defaults
    }

    /// Builds the payload a call to [`Client::speak`] would send.
    ///
    /// Default options are applied first, then `options`, then `entity`.
    pub fn build_request(
        &self,
        entity: &TextEntity,
        options: &[SpeechOption],
    ) -> Result<proto::UtteranceSynthesisRequest> {
        let mut request = Request::new();
        for option in self.defaults.iter().chain(options) {
            option.apply(&mut request)?;
        }
        entity.process(&mut request)?;
        request.build()
    }

    /// Synthesizes `entity` and returns the audio as a stream.
    ///
    /// Chunks are forwarded in the order the service sends them. A receive
    /// error ends the stream with that error. Dropping the stream stops the
    /// receive task.
    pub async fn speak(
        &self,
        entity: &TextEntity,
        options: &[SpeechOption],
    ) -> Result<AudioStream> {
        self.speak_with_cancel(CancellationToken::new(), entity, options)
            .await
    }

    /// Like [`Client::speak`], but cancelling `token` ends the stream cleanly.
    pub async fn speak_with_cancel(
        &self,
        token: CancellationToken,
        entity: &TextEntity,
        options: &[SpeechOption],
    ) -> Result<AudioStream> {
        let payload = self.build_request(entity, options)?;

        let mut call = tonic::Request::new(payload);
        self.auth
            .credentials()?
            .apply_to_metadata(call.metadata_mut())?;

        debug!("yatts v3: UtteranceSynthesis to {}", self.endpoint);

        let mut client = self.inner.clone();
        let response = tokio::select! {
            _ = token.cancelled() => {
                return Err(Error::Grpc(tonic::Status::cancelled("synthesis cancelled")));
            }
            response = client.utterance_synthesis(call) => response?,
        };

        let pump_token = token.child_token();
        let guard = pump_token.clone().drop_guard();
        let (tx, rx) = mpsc::channel(CHUNK_BUFFER);
        tokio::spawn(pump(response.into_inner(), tx, pump_token));

        Ok(AudioStream::with_guard(ReceiverStream::new(rx), guard))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

// Receive task: forwards audio chunks until the call ends, fails or is cancelled.
async fn pump(
    mut stream: Streaming<UtteranceSynthesisResponse>,
    tx: mpsc::Sender<Result<Bytes>>,
    token: CancellationToken,
) {
    loop {
        let message = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("yatts v3: synthesis cancelled");
                return;
            }
            message = stream.message() => message,
        };

        match message {
            Ok(Some(response)) => {
                let Some(chunk) = response.audio_chunk else {
                    continue;
                };
                if chunk.data.is_empty() {
                    continue;
                }
                let sent = tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("yatts v3: synthesis cancelled");
                        return;
                    }
                    sent = tx.send(Ok(Bytes::from(chunk.data))) => sent,
                };
                if sent.is_err() {
                    return;
                }
            }
            Ok(None) => {
                debug!("yatts v3: synthesis finished");
                return;
            }
            Err(status) => {
                error!("yatts v3: receive error: {}", status);
                let _ = tx.send(Err(Error::Grpc(status))).await;
                return;
            }
        }
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    auth: Arc<dyn Authenticator>,
    endpoint: String,
    channel: Option<Channel>,
    defaults: Vec<SpeechOption>,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new(auth: impl Authenticator + 'static) -> Self {
        Self {
            auth: Arc::new(auth),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            channel: None,
            defaults: Vec::new(),
        }
    }

    /// Creates a builder from the api key, folder, endpoint and defaults in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Self::new(config.authenticator()?)
            .default_options(config.v3.defaults.iter().copied());
        if let Some(ref endpoint) = config.v3.endpoint {
            builder = builder.endpoint(endpoint.clone());
        }
        Ok(builder)
    }

    /// Sets a custom endpoint.
    ///
    /// `https` endpoints use TLS. An endpoint without a scheme is treated
    /// as `https`.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Uses an existing channel instead of connecting to the endpoint.
    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Adds an option applied before every call's own options.
    pub fn default_option(mut self, option: SpeechOption) -> Self {
        self.defaults.push(option);
        self
    }

    /// Adds options applied before every call's own options.
    pub fn default_options(mut self, options: impl IntoIterator<Item = SpeechOption>) -> Self {
        self.defaults.extend(options);
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        let endpoint = if self.endpoint.contains("://") {
            self.endpoint
        } else {
            format!("https://{}", self.endpoint)
        };

        let channel = match self.channel {
            Some(channel) => channel,
            None => connect_lazy(&endpoint)?,
        };

        Ok(Client {
            inner: SynthesizerClient::new(channel),
            endpoint,
            auth: self.auth,
            defaults: Arc::new(self.defaults),
        })
    }
}

fn connect_lazy(endpoint: &str) -> Result<Channel> {
    let mut ep = Endpoint::from_shared(endpoint.to_string())
        .map_err(|e| Error::Config(format!("invalid endpoint {endpoint:?}: {e}")))?;
    if endpoint.starts_with("https://") {
        ep = ep.tls_config(ClientTlsConfig::new())?;
    }
    Ok(ep.connect_lazy())
}
