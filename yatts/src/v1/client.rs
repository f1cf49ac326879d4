//! Client for the v1 REST synthesis endpoint.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use super::options::SpeechOption;
use super::request::Request;
use super::text::TextEntity;
use crate::auth::Authenticator;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::stream::AudioStream;

/// Default v1 synthesis endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://tts.api.cloud.yandex.net/speech/v1/tts:synthesize";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// SpeechKit v1 client.
///
/// # Example
///
/// ```rust,no_run
/// use giztoy_yatts::{ApiKeyAuth, Voice};
/// use giztoy_yatts::v1::{Client, SpeechOption, TextEntity};
///
/// # async fn run() -> giztoy_yatts::Result<()> {
/// let client = Client::builder(ApiKeyAuth::new("your-api-key"))
///     .default_option(SpeechOption::voice(Voice::Alena))
///     .build()?;
///
/// let audio = client
///     .speak(&TextEntity::text("Привет!"), &[SpeechOption::speed(1.2)])
///     .await?
///     .collect_bytes()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
    auth: Arc<dyn Authenticator>,
    defaults: Arc<Vec<SpeechOption>>,
}

impl Client {
    /// Creates a new client builder.
    pub fn builder(auth: impl Authenticator + 'static) -> ClientBuilder {
        ClientBuilder::new(auth)
    }

    /// Returns the synthesis endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the options applied before every call's own options.
    pub fn default_options(&self) -> &[SpeechOption] {
        &self.defaults
    }

    /// Builds the request a call to [`Client::speak`] would send.
    ///
    /// Default options are applied first, then `options`, then `entity`.
    pub fn build_request(&self, entity: &TextEntity, options: &[SpeechOption]) -> Result<Request> {
        let mut request = Request::new();
        for option in self.defaults.iter().chain(options) {
            option.apply(&mut request)?;
        }
        entity.process(&mut request)?;
        Ok(request)
    }

    /// Synthesizes `entity` and returns the audio as a stream.
    ///
    /// Request validation and credential retrieval happen before anything
    /// is sent. A non-200 response fails with [`Error::Status`] carrying the
    /// response body.
    pub async fn speak(
        &self,
        entity: &TextEntity,
        options: &[SpeechOption],
    ) -> Result<AudioStream> {
        let body = self.build_request(entity, options)?.body()?;

        let mut headers = HeaderMap::new();
        self.auth.credentials()?.apply_to_headers(&mut headers)?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

        debug!("yatts v1: synthesize via {}", self.endpoint);

        let mut response = self
            .http
            .post(&self.endpoint)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    debug!("yatts v1: read error body: {}", e);
                    String::new()
                }
            };
            warn!("yatts v1: unexpected status {}", status);
            return Err(Error::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(AudioStream::new(async_stream::try_stream! {
            while let Some(chunk) = response.chunk().await? {
                yield chunk;
            }
        }))
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

/// Builder for [`Client`].
pub struct ClientBuilder {
    auth: Arc<dyn Authenticator>,
    endpoint: String,
    http: Option<reqwest::Client>,
    defaults: Vec<SpeechOption>,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new(auth: impl Authenticator + 'static) -> Self {
        Self {
            auth: Arc::new(auth),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            http: None,
            defaults: Vec::new(),
        }
    }

    /// Creates a builder from the api key, folder, endpoint and defaults in `config`.
    ///
    /// A non-empty `folder_id` is also sent as the `folderId` form field,
    /// unless the configured defaults set their own.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Self::new(config.authenticator()?);
        if !config.folder_id.is_empty() {
            builder = builder.default_option(SpeechOption::folder_id(config.folder_id.clone()));
        }
        builder = builder.default_options(config.v1.defaults.iter().cloned());
        if let Some(ref endpoint) = config.v1.endpoint {
            builder = builder.endpoint(endpoint.clone());
        }
        Ok(builder)
    }

    /// Sets a custom synthesis endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Uses an existing HTTP client instead of creating one.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
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
        url::Url::parse(&self.endpoint)
            .map_err(|e| Error::Config(format!("invalid endpoint {:?}: {e}", self.endpoint)))?;

        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder().build()?,
        };

        Ok(Client {
            http,
            endpoint: self.endpoint,
            auth: self.auth,
            defaults: Arc::new(self.defaults),
        })
    }
}
