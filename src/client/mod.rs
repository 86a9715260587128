//! Client layer: signs requests, drives the HTTP transport and maps
//! transport ↔ domain.

mod auth;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

pub use auth::{Authenticator, CredentialError};

use crate::domain::{
    Balance, FailedMessage, FileUpload, MessageListQuery, MessageListResponse, SendRequest,
    SendResponse, UploadedFile, ValidationError,
};

const DEFAULT_BASE_URL: &str = "https://api.solapi.com/";
const SEND_PATH: &str = "messages/v4/send-many/detail";
const MESSAGE_LIST_PATH: &str = "messages/v4/list";
const UPLOAD_PATH: &str = "storage/v1/files";
const BALANCE_PATH: &str = "cash/v1/balance";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
struct HttpRequest {
    method: HttpMethod,
    url: Url,
    authorization: String,
    /// JSON body.
    body: Option<String>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(request.url),
                HttpMethod::Post => self.client.post(request.url),
            };
            builder = builder.header(reqwest::header::AUTHORIZATION, request.authorization);
            if let Some(body) = request.body {
                builder = builder
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body);
            }
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SolapiClient`].
///
/// Local problems (credentials, validation, URL) are reported before any
/// network call is made.
pub enum SolapiError {
    /// API key or secret is unusable.
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Base URL or endpoint could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status without a recognizable error body.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The gateway rejected the whole request (unregistered sender, invalid
    /// schedule, unknown template, ...).
    #[error("request rejected ({status}): {error_code} {error_message}")]
    RemoteRejection {
        status: u16,
        error_code: String,
        error_message: String,
    },

    /// The group was created but some messages were refused.
    ///
    /// `response` is the full decoded response, accepted messages included.
    #[error("{} message(s) were not accepted", failed.len())]
    PartialSendFailure {
        failed: Vec<FailedMessage>,
        response: Box<SendResponse>,
    },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// Request body could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[source] Box<dyn StdError + Send + Sync>),
}

#[derive(Debug, Clone)]
/// Builder for [`SolapiClient`].
///
/// Use this when you need to customize the base URL, timeout, or user-agent.
pub struct SolapiClientBuilder {
    auth: Authenticator,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SolapiClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent override.
    pub fn new(auth: Authenticator) -> Self {
        Self {
            auth,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API base URL (default `https://api.solapi.com/`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`SolapiClient`].
    pub fn build(self) -> Result<SolapiClient, SolapiError> {
        let base_url = normalize_base_url(&self.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| SolapiError::Transport(Box::new(err)))?;

        Ok(SolapiClient {
            auth: Arc::new(self.auth),
            base_url,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

/// Parse the base URL and make sure relative endpoint paths are appended to it.
fn normalize_base_url(base_url: &str) -> Result<String, SolapiError> {
    let mut base = base_url.trim().to_owned();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base)?;
    Ok(base)
}

#[derive(Clone)]
/// High-level SOLAPI client.
///
/// Every call signs a fresh `Authorization` header, sends JSON and decodes the
/// response into domain types. The client is cheap to clone and can be shared
/// across tasks.
pub struct SolapiClient {
    auth: Arc<Authenticator>,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl SolapiClient {
    /// Create a client using the default base URL.
    ///
    /// For more customization, use [`SolapiClient::builder`].
    pub fn new(auth: Authenticator) -> Self {
        Self {
            auth: Arc::new(auth),
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(auth: Authenticator) -> SolapiClientBuilder {
        SolapiClientBuilder::new(auth)
    }

    /// Send a batch of messages as one message group.
    ///
    /// Errors:
    /// - [`SolapiError::Credential`] before any network call,
    /// - [`SolapiError::RemoteRejection`] when the gateway refuses the whole batch,
    /// - [`SolapiError::PartialSendFailure`] when some messages were not accepted.
    pub async fn send(&self, request: &SendRequest) -> Result<SendResponse, SolapiError> {
        let body = crate::transport::encode_send_request(request)
            .map_err(|err| SolapiError::Encode(Box::new(err)))?;

        debug!(messages = request.messages().len(), "sending message group");
        let response = self
            .execute(HttpMethod::Post, SEND_PATH, Vec::new(), Some(body))
            .await?;

        let parsed = crate::transport::decode_send_response(&response.body)
            .map_err(|err| SolapiError::Parse(Box::new(err)))?;

        if !parsed.failed_message_list.is_empty() {
            warn!(
                group_id = %parsed.group_info.group_id,
                failed = parsed.failed_message_list.len(),
                total = parsed.group_info.count.total,
                "some messages were not accepted"
            );
            return Err(SolapiError::PartialSendFailure {
                failed: parsed.failed_message_list.clone(),
                response: Box::new(parsed),
            });
        }

        Ok(parsed)
    }

    /// Query sent messages. Use `next_key` of the result with
    /// [`MessageListQuery::next_page`] to continue.
    pub async fn get_message_list(
        &self,
        query: &MessageListQuery,
    ) -> Result<MessageListResponse, SolapiError> {
        query.validate()?;
        let params = crate::transport::encode_message_list_query(query);

        let response = self
            .execute(HttpMethod::Get, MESSAGE_LIST_PATH, params, None)
            .await?;

        crate::transport::decode_message_list_response(&response.body)
            .map_err(|err| SolapiError::Parse(Box::new(err)))
    }

    /// Upload a file and return the id to reference from messages.
    pub async fn upload_file(&self, upload: &FileUpload) -> Result<UploadedFile, SolapiError> {
        let body = crate::transport::encode_upload_body(upload)
            .map_err(|err| SolapiError::Encode(Box::new(err)))?;

        debug!(
            storage_type = ?upload.storage_type(),
            bytes = upload.bytes().len(),
            "uploading file"
        );
        let response = self
            .execute(HttpMethod::Post, UPLOAD_PATH, Vec::new(), Some(body))
            .await?;

        crate::transport::decode_upload_response(&response.body)
            .map_err(|err| SolapiError::Parse(Box::new(err)))
    }

    pub async fn get_balance(&self) -> Result<Balance, SolapiError> {
        let response = self
            .execute(HttpMethod::Get, BALANCE_PATH, Vec::new(), None)
            .await?;

        crate::transport::decode_balance_response(&response.body)
            .map_err(|err| SolapiError::Parse(Box::new(err)))
    }

    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        params: Vec<(String, String)>,
        body: Option<String>,
    ) -> Result<HttpResponse, SolapiError> {
        let authorization = self.auth.generate_auth_info()?;

        let mut url = Url::parse(&self.base_url)?.join(path)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        debug!(?method, %url, "dispatching request");
        let response = self
            .http
            .execute(HttpRequest {
                method,
                url,
                authorization,
                body,
            })
            .await
            .map_err(SolapiError::Transport)?;

        if !(200..=299).contains(&response.status) {
            if let Some(remote) = crate::transport::decode_error_body(&response.body) {
                warn!(
                    status = response.status,
                    error_code = %remote.error_code,
                    "request rejected"
                );
                return Err(SolapiError::RemoteRejection {
                    status: response.status,
                    error_code: remote.error_code,
                    error_message: remote.error_message,
                });
            }
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(SolapiError::HttpStatus {
                status: response.status,
                body,
            });
        }

        Ok(response)
    }
}
