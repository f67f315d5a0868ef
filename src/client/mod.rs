//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod config;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::domain::{
    ApiKey, Email, Headers, HttpUrl, ResponseEnvelope, ResponseKind, Sms, TemplatedEmail,
    TypeMismatchError, ValidationError,
};
use crate::transport::DecodeError;

pub use config::{API_KEY_ENV, BASE_URL_ENV, ClientConfig, TIMEOUT_ENV};

const EMAIL_PATH: &str = "/email";
const SMS_PATH: &str = "/sms";
const JSON_CONTENT_TYPE: &str = "application/json";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    /// Status code and reason phrase, e.g. `401 Unauthorized`.
    status_line: String,
    body: Vec<u8>,
}

/// Sends one POST and returns the response with its body read to the end.
trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .headers(headers)
                .body(body)
                .send()
                .await?;
            let status = response.status();
            // Drained for every status so the connection can go back to the pool.
            let body = response.bytes().await?;
            Ok(HttpResponse {
                status: status.as_u16(),
                status_line: status.to_string(),
                body: body.to_vec(),
            })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SendinblueClient`].
///
/// Each failure class is its own variant so callers can decide on retries:
/// only [`SendinblueError::Transport`] and 5xx [`SendinblueError::Provider`]
/// failures are worth repeating. The client itself never retries.
pub enum SendinblueError {
    /// The message or one of its headers could not be encoded. Nothing was sent.
    #[error("encoding error: {0}")]
    Encoding(#[source] Box<dyn StdError + Send + Sync>),

    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The provider answered with an HTTP status of 400 or above.
    #[error("provider error: {status_line}")]
    Provider {
        status: u16,
        status_line: String,
        body: Option<String>,
    },

    /// A success response body could not be decoded.
    #[error("decoding error: {0}")]
    Decoding(#[source] DecodeError),

    /// A response envelope was narrowed to the wrong payload kind.
    #[error("{0}")]
    TypeMismatch(#[from] TypeMismatchError),

    /// One of the domain constructors or the configuration rejected a value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl SendinblueError {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Provider { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether the provider rejected the API key.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Provider { status: 401, .. })
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SendinblueClient`].
///
/// Use this when you need to customize the base URL, timeout, API-key header or user-agent.
pub struct SendinblueClientBuilder {
    api_key: ApiKey,
    config: ClientConfig,
}

impl SendinblueClientBuilder {
    /// Create a builder with [`ClientConfig::default`].
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            config: ClientConfig::default(),
        }
    }

    /// Read the API key from [`API_KEY_ENV`] and optional overrides from
    /// [`BASE_URL_ENV`] and [`TIMEOUT_ENV`].
    pub fn from_env() -> Result<Self, SendinblueError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SendinblueError> {
        let api_key = lookup(API_KEY_ENV)
            .ok_or(ValidationError::Empty { field: API_KEY_ENV })
            .and_then(ApiKey::new)?;
        let config = ClientConfig::default().with_overrides(&lookup)?;
        Ok(Self { api_key, config })
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the API base URL (default `https://api.sendinblue.com/v2.0`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the timeout applied to the entire request (default 15 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Override the name of the header carrying the API key (default `api-key`).
    pub fn api_key_header(mut self, name: impl Into<String>) -> Self {
        self.config.api_key_header = name.into();
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`SendinblueClient`].
    pub fn build(self) -> Result<SendinblueClient, SendinblueError> {
        let base_url = HttpUrl::parse("base_url", &self.config.base_url)?;
        let api_key_header = HeaderName::from_bytes(self.config.api_key_header.as_bytes())
            .map_err(|_| ValidationError::InvalidHeader {
                name: self.config.api_key_header.clone(),
            })?;

        let mut builder = reqwest::Client::builder().timeout(self.config.timeout);
        if let Some(user_agent) = self.config.user_agent.as_deref() {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| SendinblueError::Transport(Box::new(err)))?;

        Ok(SendinblueClient {
            api_key: self.api_key,
            api_key_header,
            base_url,
            config: self.config,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level Sendinblue client.
///
/// Every operation encodes its message as JSON, issues exactly one POST below
/// the configured base URL and decodes the `{code, message, data}` envelope.
/// The key, base URL and timeout never change after construction, and a client
/// can be cloned and shared across tasks freely.
pub struct SendinblueClient {
    api_key: ApiKey,
    api_key_header: HeaderName,
    base_url: HttpUrl,
    config: ClientConfig,
    http: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for SendinblueClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendinblueClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

impl SendinblueClient {
    /// Create a client with [`ClientConfig::default`].
    ///
    /// For more customization, use [`SendinblueClient::builder`].
    pub fn new(api_key: ApiKey) -> Result<Self, SendinblueError> {
        SendinblueClientBuilder::new(api_key).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(api_key: ApiKey) -> SendinblueClientBuilder {
        SendinblueClientBuilder::new(api_key)
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send an email through `POST /email`.
    ///
    /// The email's extra headers go out as HTTP headers too, but can never
    /// replace `Content-Type` or the API-key header.
    ///
    /// Errors:
    /// - [`SendinblueError::Encoding`] when the body or a header cannot be encoded,
    /// - [`SendinblueError::Transport`] for network failures and timeouts,
    /// - [`SendinblueError::Provider`] for HTTP statuses of 400 and above,
    /// - [`SendinblueError::Decoding`] for a malformed success body.
    pub async fn send_email(&self, email: &Email) -> Result<ResponseEnvelope, SendinblueError> {
        let body = crate::transport::encode_email_json(email)
            .map_err(encoding_error)?;
        self.post(
            "send_email",
            EMAIL_PATH,
            &email.options().headers,
            body,
            ResponseKind::Email,
        )
        .await
    }

    /// Send a provider-hosted template through `POST /template/{id}`.
    ///
    /// Errors are the same as for [`SendinblueClient::send_email`].
    pub async fn send_template(
        &self,
        template: &TemplatedEmail,
    ) -> Result<ResponseEnvelope, SendinblueError> {
        let body = crate::transport::encode_template_json(template)
            .map_err(encoding_error)?;
        self.post(
            "send_template",
            &crate::transport::template_path(template),
            &template.options().headers,
            body,
            ResponseKind::Email,
        )
        .await
    }

    /// Send an SMS through `POST /sms`. No extra headers are sent.
    ///
    /// Errors are the same as for [`SendinblueClient::send_email`].
    pub async fn send_sms(&self, sms: &Sms) -> Result<ResponseEnvelope, SendinblueError> {
        let body = crate::transport::encode_sms_json(sms)
            .map_err(encoding_error)?;
        self.post("send_sms", SMS_PATH, &Headers::new(), body, ResponseKind::Sms)
            .await
    }

    async fn post(
        &self,
        operation: &'static str,
        path: &str,
        extra_headers: &Headers,
        body: Vec<u8>,
        kind: ResponseKind,
    ) -> Result<ResponseEnvelope, SendinblueError> {
        let url = self.base_url.join_path(path);
        let headers = self.request_headers(extra_headers)?;

        tracing::debug!(operation, url = %url, body_len = body.len(), "sending request");
        let response = self
            .http
            .post_json(&url, headers, body)
            .await
            .map_err(SendinblueError::Transport)?;

        if response.status >= 400 {
            tracing::warn!(operation, status = response.status, "provider rejected request");
            let body = String::from_utf8_lossy(&response.body).trim().to_owned();
            return Err(SendinblueError::Provider {
                status: response.status,
                status_line: response.status_line,
                body: if body.is_empty() { None } else { Some(body) },
            });
        }

        crate::transport::decode_response_as(&response.body, Some(kind))
            .map_err(SendinblueError::Decoding)
    }

    /// Caller headers first, then `Content-Type`, then the API key; each insert
    /// replaces any earlier value under the same name.
    fn request_headers(&self, extra_headers: &Headers) -> Result<HeaderMap, SendinblueError> {
        let mut headers = HeaderMap::new();
        for (name, value) in extra_headers.iter() {
            if !value.is_ascii() {
                return Err(encoding_error(format!("header {name} has a non-ASCII value")));
            }
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(encoding_error)?;
            let value = HeaderValue::from_str(value).map_err(encoding_error)?;
            headers.insert(name, value);
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        let mut api_key = HeaderValue::from_str(self.api_key.as_str()).map_err(encoding_error)?;
        api_key.set_sensitive(true);
        headers.insert(self.api_key_header.clone(), api_key);

        Ok(headers)
    }
}

fn encoding_error(err: impl Into<Box<dyn StdError + Send + Sync>>) -> SendinblueError {
    SendinblueError::Encoding(err.into())
}
