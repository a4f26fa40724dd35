//! Transport layer: JSON wire format of the TextFlow API (encoding/decoding).

mod envelope;
mod send_sms;
mod verification;

pub use envelope::TransportError;
pub use send_sms::{decode_send_sms_json_response, encode_send_sms_body};
pub use verification::{
    decode_send_verification_json_response, decode_verify_code_json_response,
    encode_send_verification_body, encode_verify_code_body,
};
