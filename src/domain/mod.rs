//! Domain layer: strong types with validation and invariants (no I/O).

pub(crate) mod loose;
mod request;
mod response;
mod validation;
mod value;

pub use request::{SendSms, SendVerification, VerificationOptions, VerifyCode};
pub use response::{ApiResult, SendMessageData, VerifyCodeResult, VerifyPhoneData};
pub use validation::ValidationError;
pub use value::{
    ApiKey, CodeLength, MessageText, PhoneNumber, ProviderName, RawPhoneNumber, ValidityMinutes,
    VerificationCode,
};
