//! Authentication for SpeechKit calls.
//!
//! Two credential kinds are supported:
//!
//! 1. API key (static):
//! ```rust
//! use giztoy_yatts::ApiKeyAuth;
//!
//! let auth = ApiKeyAuth::new("your-api-key").with_folder_id("b1g...");
//! ```
//!
//! 2. IAM token (fetched from a caller supplied provider on every call):
//! ```rust
//! use giztoy_yatts::IamTokenAuth;
//!
//! let auth = IamTokenAuth::builder()
//!     .token_provider(|| Ok("t1.9euelZq...".to_string()))
//!     .build()?;
//! # Ok::<(), giztoy_yatts::Error>(())
//! ```
//!
//! The provider is never cached: keeping the token fresh is its job.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tonic::metadata::{MetadataMap, MetadataValue};

use crate::error::{BoxError, Error, Result};

/// Metadata/header key carrying the folder ID.
pub const FOLDER_ID_HEADER: &str = "x-folder-id";

/// Credentials produced for a single call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Value of the `authorization` header, e.g. `Api-Key ...` or `Bearer ...`.
    pub authorization: String,
    /// Folder ID scoping the call, if any.
    pub folder_id: Option<String>,
}

impl Credentials {
    fn new(authorization: String, folder_id: &str) -> Self {
        Self {
            authorization,
            folder_id: (!folder_id.is_empty()).then(|| folder_id.to_string()),
        }
    }

    /// Writes the credentials into HTTP headers.
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> Result<()> {
        headers.insert(AUTHORIZATION, header_value(&self.authorization)?);
        if let Some(ref folder_id) = self.folder_id {
            headers.insert(FOLDER_ID_HEADER, header_value(folder_id)?);
        }
        Ok(())
    }

    /// Writes the credentials into gRPC request metadata.
    pub fn apply_to_metadata(&self, metadata: &mut MetadataMap) -> Result<()> {
        metadata.insert("authorization", metadata_value(&self.authorization)?);
        if let Some(ref folder_id) = self.folder_id {
            metadata.insert(FOLDER_ID_HEADER, metadata_value(folder_id)?);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = self.authorization.split(' ').next().unwrap_or_default();
        f.debug_struct("Credentials")
            .field("authorization", &format_args!("{scheme} <redacted>"))
            .field("folder_id", &self.folder_id)
            .finish()
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|e| Error::Auth(format!("invalid credential header: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

fn metadata_value(value: &str) -> Result<MetadataValue<tonic::metadata::Ascii>> {
    value
        .parse()
        .map_err(|e| Error::Auth(format!("invalid credential metadata: {e}")))
}

/// Produces credentials for an outbound call.
///
/// Implementations are invoked once per call and must be safe to call
/// from concurrent tasks.
pub trait Authenticator: Send + Sync {
    /// Returns the credentials to attach to the next call.
    fn credentials(&self) -> Result<Credentials>;
}

impl<T: Authenticator + ?Sized> Authenticator for Arc<T> {
    fn credentials(&self) -> Result<Credentials> {
        (**self).credentials()
    }
}

// ================== API Key ==================

/// Static API key authentication (`Authorization: Api-Key {key}`).
#[derive(Clone)]
pub struct ApiKeyAuth {
    token: String,
    folder_id: String,
}

impl ApiKeyAuth {
    /// Creates API key authentication.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            folder_id: String::new(),
        }
    }

    /// Sets the folder ID sent with every call. Empty means unset.
    pub fn with_folder_id(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = folder_id.into();
        self
    }
}

impl Authenticator for ApiKeyAuth {
    fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials::new(
            format!("Api-Key {}", self.token),
            &self.folder_id,
        ))
    }
}

impl fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("token", &"<redacted>")
            .field("folder_id", &self.folder_id)
            .finish()
    }
}

// ================== IAM Token ==================

/// Function returning a fresh IAM token.
pub type TokenProvider = Arc<dyn Fn() -> std::result::Result<String, BoxError> + Send + Sync>;

/// IAM token authentication (`Authorization: Bearer {token}`).
#[derive(Clone)]
pub struct IamTokenAuth {
    provider: TokenProvider,
    folder_id: String,
}

impl IamTokenAuth {
    /// Creates a new builder.
    pub fn builder() -> IamTokenAuthBuilder {
        IamTokenAuthBuilder::default()
    }
}

impl Authenticator for IamTokenAuth {
    fn credentials(&self) -> Result<Credentials> {
        let token = (self.provider)().map_err(|e| Error::Auth(e.to_string()))?;
        Ok(Credentials::new(format!("Bearer {token}"), &self.folder_id))
    }
}

impl fmt::Debug for IamTokenAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamTokenAuth")
            .field("folder_id", &self.folder_id)
            .finish_non_exhaustive()
    }
}

/// Builder for [`IamTokenAuth`].
#[derive(Default)]
pub struct IamTokenAuthBuilder {
    provider: Option<TokenProvider>,
    folder_id: String,
}

impl IamTokenAuthBuilder {
    /// Sets the function used to obtain the IAM token.
    pub fn token_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> std::result::Result<String, BoxError> + Send + Sync + 'static,
    {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Sets the folder ID sent with every call. Empty means unset.
    pub fn folder_id(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = folder_id.into();
        self
    }

    /// Builds the authenticator.
    pub fn build(self) -> Result<IamTokenAuth> {
        let provider = self
            .provider
            .ok_or_else(|| Error::Config("invalid IAM token provider".to_string()))?;

        Ok(IamTokenAuth {
            provider,
            folder_id: self.folder_id,
        })
    }
}
