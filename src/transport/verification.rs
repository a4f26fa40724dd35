use serde::Serialize;

use super::envelope::{JsonEnvelope, TransportError, decode_envelope};
use crate::domain::{
    ApiResult, SendVerification, VerifyCode, VerifyCodeResult, VerifyPhoneData, loose,
};

#[derive(Debug, Serialize)]
struct SendVerificationJsonBody<'a> {
    phone_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minutes: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_length: Option<u8>,
}

#[derive(Debug, Serialize)]
struct VerifyCodeJsonBody<'a> {
    phone_number: &'a str,
    code: &'a str,
}

pub fn encode_send_verification_body(request: &SendVerification) -> Result<String, TransportError> {
    let options = request.options();
    let body = SendVerificationJsonBody {
        phone_number: request.phone_number().raw(),
        provider: options.provider.as_ref().map(|it| it.as_str()),
        minutes: options.minutes.map(|it| it.value()),
        code_length: options.code_length.map(|it| it.value()),
    };
    serde_json::to_string(&body).map_err(TransportError::Encode)
}

pub fn decode_send_verification_json_response(
    http_status: u16,
    json: &str,
) -> Result<ApiResult<VerifyPhoneData>, TransportError> {
    decode_envelope(http_status, json)
}

pub fn encode_verify_code_body(request: &VerifyCode) -> Result<String, TransportError> {
    let body = VerifyCodeJsonBody {
        phone_number: request.phone_number().raw(),
        code: request.code().as_str(),
    };
    serde_json::to_string(&body).map_err(TransportError::Encode)
}

/// The service reports the outcome either next to the envelope fields or nested in
/// `data`; top-level fields win. `data` itself is passed through untouched.
pub fn decode_verify_code_json_response(
    http_status: u16,
    json: &str,
) -> Result<VerifyCodeResult, TransportError> {
    let mut envelope = JsonEnvelope::parse(http_status, json)?;
    let data = envelope.take_data();
    let outcome = |key: &str| {
        envelope
            .rest
            .get(key)
            .filter(|it| !it.is_null())
            .or_else(|| data.as_ref().and_then(|it| it.get(key)))
    };

    let valid = outcome("valid").and_then(loose::as_bool).unwrap_or(false);
    let valid_code = outcome("valid_code").and_then(loose::as_string);
    let expires = outcome("expires").and_then(loose::as_i64);

    Ok(VerifyCodeResult {
        ok: envelope.ok,
        status: envelope.status,
        message: envelope.message,
        valid,
        valid_code,
        expires,
        data,
    })
}
