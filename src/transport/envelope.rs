use serde_json::{Map, Value};

use crate::domain::{ApiResult, loose};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Envelope fields read independently of the payload, so an unexpected `data` never
/// hides the service's own `ok`/`status`/`message`.
pub(super) struct JsonEnvelope {
    pub(super) ok: bool,
    pub(super) status: u16,
    pub(super) message: String,
    /// Remaining top-level keys, `data` included.
    pub(super) rest: Map<String, Value>,
}

impl JsonEnvelope {
    /// Missing or unreadable envelope fields count as failure: `ok` becomes `false` and
    /// `status` the HTTP status of the exchange.
    pub(super) fn parse(http_status: u16, json: &str) -> Result<Self, TransportError> {
        let mut rest: Map<String, Value> = serde_json::from_str(json)?;
        let ok = rest.remove("ok");
        let status = rest.remove("status");
        let message = rest.remove("message");

        Ok(Self {
            ok: ok.as_ref().and_then(loose::as_bool).unwrap_or(false),
            status: status.as_ref().and_then(loose::as_u16).unwrap_or(http_status),
            message: message
                .as_ref()
                .and_then(loose::as_string)
                .unwrap_or_default(),
            rest,
        })
    }

    /// Payload under `data`; `null` counts as absent.
    pub(super) fn take_data(&mut self) -> Option<Value> {
        self.rest.remove("data").filter(|it| !it.is_null())
    }
}

pub fn decode_envelope<T: From<Value>>(
    http_status: u16,
    json: &str,
) -> Result<ApiResult<T>, TransportError> {
    let mut envelope = JsonEnvelope::parse(http_status, json)?;
    let data = envelope.take_data().map(T::from);

    Ok(ApiResult {
        ok: envelope.ok,
        status: envelope.status,
        message: envelope.message,
        data,
    })
}
