//! Client layer: orchestrates validation, transport calls and result normalization.

mod credential;
mod invoke;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use url::Url;

use crate::domain::{
    ApiKey, ApiResult, RawPhoneNumber, SendMessageData, SendSms, SendVerification,
    ValidationError, VerificationOptions, VerifyCode, VerifyCodeResult, VerifyPhoneData,
};
use crate::transport::TransportError;
use credential::CredentialStore;

const DEFAULT_BASE_URL: &str = "https://textflow.me/";
const SEND_SMS_PATH: &str = "messages/send";
const SEND_VERIFICATION_PATH: &str = "phone/verify";
const VERIFY_CODE_PATH: &str = "phone/check";

/// Status used for failures where no usable response came back from the service.
const BAD_GATEWAY: u16 = 502;
/// Status used for failures detected before any request is sent.
const BAD_REQUEST: u16 = 400;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        bearer: &'a str,
        body: String,
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
        bearer: &'a str,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .bearer_auth(bearer)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Failures detected by [`TextFlowClient`].
///
/// Operations never return these directly: each one is folded into the result
/// envelope, with [`TextFlowError::status`] as `status` and the display text as
/// `message`. Failures reported by the service itself (`ok: false`) are passed
/// through unchanged and never show up here.
pub enum TextFlowError {
    /// A required field is missing or an option value is out of range.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No API key has been set on the client.
    #[error("missing API key")]
    MissingApiKey,

    /// HTTP client / transport failure (DNS, TLS, connection reset, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Response body is not the JSON the service documents.
    #[error("invalid response (HTTP {http_status}): {source}")]
    Decode {
        http_status: u16,
        #[source]
        source: TransportError,
    },

    /// The configured base URL cannot be used to build endpoint URLs.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl TextFlowError {
    /// HTTP-like status reported in the result envelope for this failure.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::MissingApiKey | Self::InvalidBaseUrl(_) => BAD_REQUEST,
            Self::Transport(_) => BAD_GATEWAY,
            Self::Decode { http_status, .. } => {
                if (200..=299).contains(http_status) {
                    BAD_GATEWAY
                } else {
                    *http_status
                }
            }
        }
    }
}

/// Result shapes that can carry a local failure.
pub trait FailureEnvelope {
    /// Builds the `ok: false` result for `err`, with [`TextFlowError::status`] as its
    /// status and the error's display text as its message.
    fn from_error(err: &TextFlowError) -> Self;
}

impl<T> FailureEnvelope for ApiResult<T> {
    fn from_error(err: &TextFlowError) -> Self {
        ApiResult::failure(err.status(), err.to_string())
    }
}

impl FailureEnvelope for VerifyCodeResult {
    fn from_error(err: &TextFlowError) -> Self {
        VerifyCodeResult::failure(err.status(), err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
/// Builder for [`TextFlowClient`].
///
/// Use this when you need a different base URL (for example a staging host) or a
/// custom user-agent.
pub struct TextFlowClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    user_agent: Option<String>,
}

impl TextFlowClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial API key. It can still be replaced later with [`TextFlowClient::set_key`].
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the service base URL (default `https://textflow.me/`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`TextFlowClient`].
    pub fn build(self) -> Result<TextFlowClient, TextFlowError> {
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let endpoints = Endpoints::from_base(base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| TextFlowError::Transport(Box::new(err)))?;

        Ok(TextFlowClient {
            credentials: CredentialStore::new(self.api_key.unwrap_or_default()),
            endpoints,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Endpoints {
    send_sms: String,
    send_verification: String,
    verify_code: String,
}

impl Endpoints {
    fn from_base(base_url: &str) -> Result<Self, TextFlowError> {
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            send_sms: base.join(SEND_SMS_PATH)?.into(),
            send_verification: base.join(SEND_VERIFICATION_PATH)?.into(),
            verify_code: base.join(VERIFY_CODE_PATH)?.into(),
        })
    }

    fn default_endpoints() -> Self {
        Self {
            send_sms: format!("{DEFAULT_BASE_URL}{SEND_SMS_PATH}"),
            send_verification: format!("{DEFAULT_BASE_URL}{SEND_VERIFICATION_PATH}"),
            verify_code: format!("{DEFAULT_BASE_URL}{VERIFY_CODE_PATH}"),
        }
    }
}

#[derive(Clone)]
/// High-level TextFlow client.
///
/// Every operation validates its inputs, reads the API key at dispatch time, sends one
/// JSON `POST` and normalizes the answer into a result envelope. Operations never fail
/// with an error value: validation problems, a missing key, transport failures and
/// service-side errors all come back as `ok: false` with a status and message.
///
/// Clones share the API key, so [`TextFlowClient::set_key`] on any clone affects the
/// next call made through all of them.
pub struct TextFlowClient {
    credentials: CredentialStore,
    endpoints: Endpoints,
    http: Arc<dyn HttpTransport>,
}

impl Default for TextFlowClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFlowClient {
    /// Create a client for the default TextFlow host with no API key set.
    pub fn new() -> Self {
        Self {
            credentials: CredentialStore::default(),
            endpoints: Endpoints::default_endpoints(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Create a client for the default TextFlow host using `api_key`.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        let client = Self::new();
        client.set_key(api_key);
        client
    }

    /// Start building a client with custom settings.
    pub fn builder() -> TextFlowClientBuilder {
        TextFlowClientBuilder::new()
    }

    /// Replace the API key. The value is not validated here; a blank key makes the
    /// next call fail with "missing API key".
    pub fn set_key(&self, api_key: impl Into<String>) -> &Self {
        self.credentials.set(api_key);
        self
    }

    /// Whether a non-blank API key is currently set.
    pub fn has_key(&self) -> bool {
        self.credentials.snapshot().is_some()
    }

    /// Send an SMS with body `text` to `recipient` (including the country calling code,
    /// like `+381617581234`).
    ///
    /// On success `data` holds the delivery receipt.
    pub async fn send_sms(
        &self,
        recipient: impl Into<String>,
        text: impl Into<String>,
    ) -> ApiResult<SendMessageData> {
        match SendSms::new(recipient, text) {
            Ok(request) => self.send_sms_request(request).await,
            Err(err) => finish("send_sms", Err(err.into())),
        }
    }

    /// Same as [`TextFlowClient::send_sms`] for an already validated request.
    pub async fn send_sms_request(&self, request: SendSms) -> ApiResult<SendMessageData> {
        let result = self
            .dispatch(
                "send_sms",
                &self.endpoints.send_sms,
                request.recipient(),
                crate::transport::encode_send_sms_body(&request),
                crate::transport::decode_send_sms_json_response,
            )
            .await;
        finish("send_sms", result)
    }

    /// Callback form of [`TextFlowClient::send_sms`].
    pub async fn send_sms_with<F>(
        &self,
        recipient: impl Into<String>,
        text: impl Into<String>,
        callback: F,
    ) where
        F: FnOnce(ApiResult<SendMessageData>),
    {
        invoke::deliver(self.send_sms(recipient, text), callback).await;
    }

    /// Send a verification code to `phone_number`.
    ///
    /// Options left unset are omitted so that the service defaults apply (30 minutes
    /// validity, 4 digits, no provider name). On success `data` holds the generated code,
    /// its expiry and the full message text.
    pub async fn send_verification(
        &self,
        phone_number: impl Into<String>,
        options: VerificationOptions,
    ) -> ApiResult<VerifyPhoneData> {
        match SendVerification::new(phone_number, options) {
            Ok(request) => self.send_verification_request(request).await,
            Err(err) => finish("send_verification", Err(err.into())),
        }
    }

    /// Same as [`TextFlowClient::send_verification`] for an already validated request.
    pub async fn send_verification_request(
        &self,
        request: SendVerification,
    ) -> ApiResult<VerifyPhoneData> {
        let result = self
            .dispatch(
                "send_verification",
                &self.endpoints.send_verification,
                request.phone_number(),
                crate::transport::encode_send_verification_body(&request),
                crate::transport::decode_send_verification_json_response,
            )
            .await;
        finish("send_verification", result)
    }

    /// Callback form of [`TextFlowClient::send_verification`].
    pub async fn send_verification_with<F>(
        &self,
        phone_number: impl Into<String>,
        options: VerificationOptions,
        callback: F,
    ) where
        F: FnOnce(ApiResult<VerifyPhoneData>),
    {
        invoke::deliver(self.send_verification(phone_number, options), callback).await;
    }

    /// Check a code the user submitted for `phone_number`.
    ///
    /// `valid` tells whether the code matches; it is `false` for every failure.
    pub async fn verify_code(
        &self,
        phone_number: impl Into<String>,
        code: impl Into<String>,
    ) -> VerifyCodeResult {
        match VerifyCode::new(phone_number, code) {
            Ok(request) => self.verify_code_request(request).await,
            Err(err) => finish("verify_code", Err(err.into())),
        }
    }

    /// Same as [`TextFlowClient::verify_code`] for an already validated request.
    pub async fn verify_code_request(&self, request: VerifyCode) -> VerifyCodeResult {
        let result = self
            .dispatch(
                "verify_code",
                &self.endpoints.verify_code,
                request.phone_number(),
                crate::transport::encode_verify_code_body(&request),
                crate::transport::decode_verify_code_json_response,
            )
            .await;
        finish("verify_code", result)
    }

    /// Callback form of [`TextFlowClient::verify_code`].
    pub async fn verify_code_with<F>(
        &self,
        phone_number: impl Into<String>,
        code: impl Into<String>,
        callback: F,
    ) where
        F: FnOnce(VerifyCodeResult),
    {
        invoke::deliver(self.verify_code(phone_number, code), callback).await;
    }

    async fn dispatch<T>(
        &self,
        operation: &'static str,
        endpoint: &str,
        phone_number: &RawPhoneNumber,
        body: Result<String, TransportError>,
        decode: fn(u16, &str) -> Result<T, TransportError>,
    ) -> Result<T, TextFlowError> {
        let api_key: ApiKey = self
            .credentials
            .snapshot()
            .ok_or(TextFlowError::MissingApiKey)?;
        let body = body.map_err(|err| TextFlowError::Transport(Box::new(err)))?;

        tracing::debug!(
            operation,
            endpoint,
            phone_number = %phone_number.masked(),
            "sending TextFlow request"
        );

        let response = self
            .http
            .post_json(endpoint, api_key.as_str(), body)
            .await
            .map_err(TextFlowError::Transport)?;

        decode(response.status, &response.body).map_err(|source| TextFlowError::Decode {
            http_status: response.status,
            source,
        })
    }
}

fn finish<R: FailureEnvelope + Outcome>(
    operation: &'static str,
    result: Result<R, TextFlowError>,
) -> R {
    match result {
        Ok(response) => {
            tracing::debug!(
                operation,
                ok = response.ok(),
                status = response.status(),
                "TextFlow request completed"
            );
            response
        }
        Err(err) => {
            tracing::warn!(operation, status = err.status(), error = %err, "TextFlow request failed");
            R::from_error(&err)
        }
    }
}

/// Read access to the envelope fields shared by every result shape.
trait Outcome {
    fn ok(&self) -> bool;
    fn status(&self) -> u16;
}

impl<T> Outcome for ApiResult<T> {
    fn ok(&self) -> bool {
        self.ok
    }

    fn status(&self) -> u16 {
        self.status
    }
}

impl Outcome for VerifyCodeResult {
    fn ok(&self) -> bool {
        self.ok
    }

    fn status(&self) -> u16 {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use crate::domain::{CodeLength, ProviderName, ValidityMinutes};

    use super::*;

    type Hook = Arc<dyn Fn() + Send + Sync>;

    #[derive(Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
        on_post: Option<Hook>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        calls: usize,
        last_url: Option<String>,
        last_bearer: Option<String>,
        last_body: Option<String>,
        response: Result<(u16, String), String>,
    }

    #[derive(Debug)]
    struct ConnectionRefused(String);

    impl std::fmt::Display for ConnectionRefused {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl StdError for ConnectionRefused {}

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self::with_response(Ok((response_status, response_body.into())))
        }

        fn failing(message: impl Into<String>) -> Self {
            Self::with_response(Err(message.into()))
        }

        fn with_response(response: Result<(u16, String), String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    calls: 0,
                    last_url: None,
                    last_bearer: None,
                    last_body: None,
                    response,
                })),
                on_post: None,
            }
        }

        fn on_post(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
            self.on_post = Some(Arc::new(hook));
            self
        }

        fn calls(&self) -> usize {
            self.state.lock().unwrap().calls
        }

        fn last_request(&self) -> (Option<String>, Option<String>, Option<serde_json::Value>) {
            let state = self.state.lock().unwrap();
            (
                state.last_url.clone(),
                state.last_bearer.clone(),
                state
                    .last_body
                    .as_deref()
                    .map(|body| serde_json::from_str(body).unwrap()),
            )
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_json<'a>(
            &'a self,
            url: &'a str,
            bearer: &'a str,
            body: String,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let response = {
                    let mut state = self.state.lock().unwrap();
                    state.calls += 1;
                    state.last_url = Some(url.to_owned());
                    state.last_bearer = Some(bearer.to_owned());
                    state.last_body = Some(body);
                    state.response.clone()
                };
                if let Some(hook) = self.on_post.as_ref() {
                    hook();
                }
                match response {
                    Ok((status, body)) => Ok(HttpResponse { status, body }),
                    Err(message) => {
                        let err: Box<dyn StdError + Send + Sync> =
                            Box::new(ConnectionRefused(message));
                        Err(err)
                    }
                }
            })
        }
    }

    fn make_client(credentials: CredentialStore, transport: FakeTransport) -> TextFlowClient {
        TextFlowClient {
            credentials,
            endpoints: Endpoints::from_base("https://example.invalid/").unwrap(),
            http: Arc::new(transport),
        }
    }

    fn keyed_client(transport: FakeTransport) -> TextFlowClient {
        make_client(CredentialStore::new("k1"), transport)
    }

    const SEND_OK: &str = r#"
    {
      "ok": true,
      "status": 200,
      "message": "Message sent",
      "data": {
        "to": "+3811234567",
        "content": "hello",
        "country": "RS",
        "price": 0.01,
        "timestamp": 1700000000
      }
    }
    "#;

    #[tokio::test]
    async fn send_sms_posts_json_with_bearer_and_returns_receipt() {
        let transport = FakeTransport::new(200, SEND_OK);
        let client = keyed_client(transport.clone());

        let result = client.send_sms("+3811234567", "hello").await;

        assert!(result.ok);
        assert_eq!(result.status, 200);
        assert_eq!(result.message, "Message sent");
        let data = result.data.as_ref().unwrap();
        assert_eq!(data.to().as_deref(), Some("+3811234567"));
        assert_eq!(data.content().as_deref(), Some("hello"));
        assert_eq!(data.country_code().as_deref(), Some("RS"));
        assert_eq!(data.price().as_deref(), Some("0.01"));
        assert_eq!(data.timestamp(), Some(1_700_000_000));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::from_str::<serde_json::Value>(SEND_OK).unwrap()
        );

        let (url, bearer, body) = transport.last_request();
        assert_eq!(url.as_deref(), Some("https://example.invalid/messages/send"));
        assert_eq!(bearer.as_deref(), Some("k1"));
        assert_eq!(
            body,
            Some(json!({ "recipient": "+3811234567", "text": "hello" }))
        );
    }

    #[tokio::test]
    async fn missing_fields_fail_with_400_without_network() {
        let transport = FakeTransport::new(200, SEND_OK);
        let client = keyed_client(transport.clone());

        let result = client.send_sms("", "hi").await;
        assert_eq!(result, ApiResult::failure(400, "recipient missing"));

        let result = client.send_sms("+3811234567", "").await;
        assert_eq!(result, ApiResult::failure(400, "text missing"));

        let result = client
            .send_verification(" ", VerificationOptions::default())
            .await;
        assert_eq!(result, ApiResult::failure(400, "phone number missing"));

        let result = client.verify_code("", "1234").await;
        assert_eq!(result, VerifyCodeResult::failure(400, "phone number missing"));

        let result = client.verify_code("+3811234567", "").await;
        assert_eq!(result, VerifyCodeResult::failure(400, "code missing"));

        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn missing_key_fails_with_400_without_network() {
        let transport = FakeTransport::new(200, SEND_OK);
        let client = make_client(CredentialStore::default(), transport.clone());
        assert!(!client.has_key());

        let result = client.send_sms("+3811234567", "hello").await;
        assert_eq!(result, ApiResult::failure(400, "missing API key"));

        let result = client
            .send_verification("+3811234567", VerificationOptions::default())
            .await;
        assert_eq!(result, ApiResult::failure(400, "missing API key"));

        let result = client.verify_code("+3811234567", "1234").await;
        assert_eq!(result, VerifyCodeResult::failure(400, "missing API key"));

        client.set_key("   ");
        let result = client.send_sms("+3811234567", "hello").await;
        assert_eq!(result.message, "missing API key");

        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn field_validation_runs_before_key_check() {
        let client = make_client(CredentialStore::default(), FakeTransport::new(200, "{}"));
        let result = client.send_sms("+3811234567", " ").await;
        assert_eq!(result.message, "text missing");
    }

    #[tokio::test]
    async fn callback_and_awaitable_styles_match() {
        let transport = FakeTransport::new(200, SEND_OK);
        let client = keyed_client(transport.clone());

        let awaited = client.send_sms("+3811234567", "hello").await;

        let mut delivered = Vec::new();
        client
            .send_sms_with("+3811234567", "hello", |result| delivered.push(result))
            .await;

        assert_eq!(delivered, vec![awaited]);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn callback_style_delivers_local_failures_once() {
        let transport = FakeTransport::new(200, "{}");
        let client = make_client(CredentialStore::default(), transport.clone());

        let mut delivered = Vec::new();
        client
            .verify_code_with("+3811234567", "1234", |result| delivered.push(result))
            .await;
        client
            .send_verification_with("", VerificationOptions::default(), |result| {
                assert_eq!(result.message, "phone number missing");
            })
            .await;

        assert_eq!(delivered, vec![VerifyCodeResult::failure(400, "missing API key")]);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn remote_failure_is_passed_through_verbatim() {
        let json = r#"{ "ok": false, "status": 401, "message": "API key not valid" }"#;
        let client = keyed_client(FakeTransport::new(401, json));

        let result = client.send_sms("+3811234567", "hello").await;
        assert_eq!(result, ApiResult::failure(401, "API key not valid"));
    }

    #[tokio::test]
    async fn remote_failure_keeps_its_status_when_data_is_unexpected() {
        let body = json!({
            "ok": false,
            "status": 400,
            "message": "Recipient not supported",
            "data": { "reason": "country" }
        });
        let client = keyed_client(FakeTransport::new(400, body.to_string()));

        let result = client.send_sms("+3811234567", "hello").await;
        assert!(!result.ok);
        assert_eq!(result.status, 400);
        assert_eq!(result.message, "Recipient not supported");
        assert_eq!(serde_json::to_value(&result).unwrap(), body);

        let result = client
            .send_verification("+3811234567", VerificationOptions::default())
            .await;
        assert_eq!(result.status, 400);
        assert_eq!(result.message, "Recipient not supported");

        let result = client.verify_code("+3811234567", "1234").await;
        assert_eq!(result.status, 400);
        assert!(!result.valid);
        assert_eq!(result.data, Some(json!({ "reason": "country" })));
    }

    #[tokio::test]
    async fn receipt_with_extra_and_loosely_typed_fields_succeeds() {
        let body = json!({
            "ok": true,
            "status": 200,
            "message": "Message sent",
            "data": {
                "to": "+3811234567",
                "content": "hello",
                "country_code": "RS",
                "price": "0.0100",
                "timestamp": 1_700_000_000.5,
                "segments": 1
            },
            "request_id": "r-17"
        });
        let client = keyed_client(FakeTransport::new(200, body.to_string()));

        let result = client.send_sms("+3811234567", "hello").await;
        assert!(result.ok);
        assert_eq!(result.status, 200);
        let data = result.data.as_ref().unwrap();
        assert_eq!(data.price().as_deref(), Some("0.0100"));
        assert_eq!(data.timestamp(), Some(1_700_000_000));
        assert_eq!(data.field("segments"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn verify_code_accepts_string_flag_and_float_expiry() {
        let json = r#"{ "ok": true, "status": 200, "message": "checked",
                        "valid": "true", "expires": 1700001800.0 }"#;
        let client = keyed_client(FakeTransport::new(200, json));

        let result = client.verify_code("+3811234567", "1234").await;
        assert!(result.ok);
        assert!(result.valid);
        assert_eq!(result.expires, Some(1_700_001_800));
    }

    #[tokio::test]
    async fn response_without_data_omits_it() {
        let json = r#"{ "ok": true, "status": 200, "message": "sent" }"#;
        let client = keyed_client(FakeTransport::new(200, json));

        let result = client.send_sms("+3811234567", "hello").await;
        assert!(result.ok);
        assert_eq!(result.data, None);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "ok": true, "status": 200, "message": "sent" })
        );
    }

    #[tokio::test]
    async fn transport_failure_maps_to_bad_gateway() {
        let client = keyed_client(FakeTransport::failing("connection refused"));

        let result = client.send_sms("+3811234567", "hello").await;
        assert!(!result.ok);
        assert_eq!(result.status, 502);
        assert_eq!(result.message, "transport error: connection refused");
        assert_eq!(result.data, None);

        let result = client.verify_code("+3811234567", "1234").await;
        assert_eq!(result.status, 502);
        assert!(!result.valid);
    }

    #[tokio::test]
    async fn undecodable_body_uses_http_status_when_not_successful() {
        let client = keyed_client(FakeTransport::new(503, "<html>unavailable</html>"));
        let result = client.send_sms("+3811234567", "hello").await;
        assert_eq!(result.status, 503);
        assert!(result.message.starts_with("invalid response (HTTP 503)"));

        let client = keyed_client(FakeTransport::new(200, "not json"));
        let result = client.send_sms("+3811234567", "hello").await;
        assert_eq!(result.status, 502);
    }

    #[tokio::test]
    async fn send_verification_sends_only_set_options() {
        let json = r#"
        {
          "ok": true,
          "status": 200,
          "message": "Verification message sent",
          "data": {
            "verification_code": "123456",
            "expires": 1700003600,
            "message_text": "Your verification code for Guest is: 123456"
          }
        }
        "#;
        let transport = FakeTransport::new(200, json);
        let client = keyed_client(transport.clone());

        let options = VerificationOptions::default()
            .provider(ProviderName::new("Guest").unwrap())
            .code_length(CodeLength::new(6).unwrap());
        let result = client.send_verification("+3811234567", options).await;

        assert!(result.ok);
        assert_eq!(
            result.data.and_then(|data| data.verification_code()),
            Some("123456".to_owned())
        );

        let (url, bearer, body) = transport.last_request();
        assert_eq!(url.as_deref(), Some("https://example.invalid/phone/verify"));
        assert_eq!(bearer.as_deref(), Some("k1"));
        assert_eq!(
            body,
            Some(json!({
                "phone_number": "+3811234567",
                "provider": "Guest",
                "code_length": 6
            }))
        );

        let options = VerificationOptions::default().minutes(ValidityMinutes::new(5).unwrap());
        client.send_verification("+3811234567", options).await;
        let (_, _, body) = transport.last_request();
        assert_eq!(body, Some(json!({ "phone_number": "+3811234567", "minutes": 5 })));
    }

    #[tokio::test]
    async fn verify_code_always_reports_valid_flag() {
        let json = r#"{ "ok": true, "status": 200, "message": "checked", "valid": true }"#;
        let transport = FakeTransport::new(200, json);
        let client = keyed_client(transport.clone());

        let result = client.verify_code("+3811234567", "1234").await;
        assert_eq!(
            result,
            VerifyCodeResult {
                ok: true,
                status: 200,
                message: "checked".to_owned(),
                valid: true,
                valid_code: None,
                expires: None,
                data: None,
            }
        );

        let (url, _, body) = transport.last_request();
        assert_eq!(url.as_deref(), Some("https://example.invalid/phone/check"));
        assert_eq!(
            body,
            Some(json!({ "phone_number": "+3811234567", "code": "1234" }))
        );

        let json = r#"{ "ok": true, "status": 200, "message": "checked" }"#;
        let client = keyed_client(FakeTransport::new(200, json));
        let result = client.verify_code("+3811234567", "0000").await;
        assert!(!result.valid);
    }

    #[tokio::test]
    async fn last_key_wins_and_in_flight_calls_keep_their_key() {
        let credentials = CredentialStore::new("k1");
        let writer = credentials.clone();
        let transport = FakeTransport::new(200, SEND_OK).on_post(move || writer.set("k2"));
        let client = make_client(credentials, transport.clone());

        client.send_sms("+3811234567", "hello").await;
        let (_, bearer, _) = transport.last_request();
        assert_eq!(bearer.as_deref(), Some("k1"));

        client.send_sms("+3811234567", "hello").await;
        let (_, bearer, _) = transport.last_request();
        assert_eq!(bearer.as_deref(), Some("k2"));

        client.set_key("k3").set_key("k4");
        client.send_sms("+3811234567", "hello").await;
        let (_, bearer, _) = transport.last_request();
        assert_eq!(bearer.as_deref(), Some("k4"));
    }

    #[tokio::test]
    async fn clones_share_the_key() {
        let transport = FakeTransport::new(200, SEND_OK);
        let client = make_client(CredentialStore::default(), transport.clone());
        let other = client.clone();

        other.set_key("shared");
        assert!(client.has_key());
        client.send_sms("+3811234567", "hello").await;

        let (_, bearer, _) = transport.last_request();
        assert_eq!(bearer.as_deref(), Some("shared"));
    }

    #[test]
    fn error_statuses_are_well_defined() {
        assert_eq!(TextFlowError::MissingApiKey.status(), 400);
        assert_eq!(
            TextFlowError::Validation(ValidationError::Missing { field: "text" }).status(),
            400
        );
        assert_eq!(
            TextFlowError::Transport(Box::new(ConnectionRefused("reset".to_owned()))).status(),
            502
        );
    }

    #[test]
    fn builder_derives_endpoints_from_base_url() {
        let client = TextFlowClient::builder()
            .api_key("key")
            .base_url("https://staging.example.invalid/api")
            .user_agent("textflow-tests")
            .build()
            .unwrap();
        assert!(client.has_key());
        assert_eq!(
            client.endpoints,
            Endpoints {
                send_sms: "https://staging.example.invalid/api/messages/send".to_owned(),
                send_verification: "https://staging.example.invalid/api/phone/verify".to_owned(),
                verify_code: "https://staging.example.invalid/api/phone/check".to_owned(),
            }
        );

        let client = TextFlowClient::builder().build().unwrap();
        assert!(!client.has_key());
        assert_eq!(client.endpoints, Endpoints::default_endpoints());
    }

    #[test]
    fn builder_rejects_unusable_base_url() {
        assert!(matches!(
            TextFlowClient::builder().base_url("not a url").build(),
            Err(TextFlowError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            TextFlowClient::builder().base_url("mailto:ops@example.invalid").build(),
            Err(TextFlowError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn with_key_sets_the_initial_key() {
        assert!(TextFlowClient::with_key("k1").has_key());
        assert!(!TextFlowClient::new().has_key());
    }
}
