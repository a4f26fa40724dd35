use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::loose;

/// Uniform result envelope returned by every TextFlow operation.
///
/// Local failures (validation, missing API key, transport) use the same shape as
/// responses from the service, so callers only inspect `ok`/`status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub ok: bool,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status,
            message: message.into(),
            data: None,
        }
    }
}

/// Delivery receipt for a sent SMS.
///
/// Holds the `data` value exactly as the service sent it, including keys this crate
/// does not know about; the accessors read the documented fields leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SendMessageData(Value);

impl SendMessageData {
    pub fn to(&self) -> Option<String> {
        self.field("to").and_then(loose::as_string)
    }

    pub fn content(&self) -> Option<String> {
        self.field("content").and_then(loose::as_string)
    }

    /// ISO country code of the recipient, sent as `country_code` or `country`.
    pub fn country_code(&self) -> Option<String> {
        self.field("country_code")
            .or_else(|| self.field("country"))
            .and_then(loose::as_string)
    }

    /// Price as a decimal string, in the spelling the service used.
    pub fn price(&self) -> Option<String> {
        self.field("price").and_then(loose::as_string)
    }

    pub fn price_f64(&self) -> Option<f64> {
        self.field("price").and_then(loose::as_f64)
    }

    /// Delivery time as a Unix timestamp in seconds.
    pub fn timestamp(&self) -> Option<i64> {
        self.field("timestamp").and_then(loose::as_i64)
    }

    /// Any field of the payload, by key.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }
}

impl From<Value> for SendMessageData {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Details of a started phone verification, kept as sent by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerifyPhoneData(Value);

impl VerifyPhoneData {
    /// The generated code. Numeric codes are returned in their JSON spelling.
    pub fn verification_code(&self) -> Option<String> {
        self.field("verification_code").and_then(loose::as_string)
    }

    /// Expiry as a Unix timestamp in seconds.
    pub fn expires(&self) -> Option<i64> {
        self.field("expires").and_then(loose::as_i64)
    }

    /// Full text of the message sent to the recipient.
    pub fn message_text(&self) -> Option<String> {
        self.field("message_text").and_then(loose::as_string)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }
}

impl From<Value> for VerifyPhoneData {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Result of checking a verification code. `valid` is always present and is `false`
/// for every failure. `data` carries the service's payload untouched, when it sent one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyCodeResult {
    pub ok: bool,
    pub status: u16,
    pub message: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl VerifyCodeResult {
    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status,
            message: message.into(),
            valid: false,
            valid_code: None,
            expires: None,
            data: None,
        }
    }
}
