use serde::Serialize;

use super::envelope::{TransportError, decode_envelope};
use crate::domain::{ApiResult, SendMessageData, SendSms};

#[derive(Debug, Serialize)]
struct SendSmsJsonBody<'a> {
    recipient: &'a str,
    text: &'a str,
}

pub fn encode_send_sms_body(request: &SendSms) -> Result<String, TransportError> {
    let body = SendSmsJsonBody {
        recipient: request.recipient().raw(),
        text: request.text().as_str(),
    };
    serde_json::to_string(&body).map_err(TransportError::Encode)
}

pub fn decode_send_sms_json_response(
    http_status: u16,
    json: &str,
) -> Result<ApiResult<SendMessageData>, TransportError> {
    decode_envelope(http_status, json)
}
