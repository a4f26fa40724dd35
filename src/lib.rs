//! Typed Rust client for the TextFlow SMS and phone verification API.
//!
//! The crate is split into a domain layer of validated types and result envelopes, a
//! transport layer for the JSON wire format, and a small client layer that validates,
//! sends one request per call and normalizes the answer.
//!
//! Operations never return `Err`: every outcome, including local validation failures
//! and transport errors, comes back as an envelope with `ok`, `status` and `message`.
//!
//! ```rust,no_run
//! use textflow::{TextFlowClient, VerificationOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = TextFlowClient::new();
//!     client.set_key("YOUR_API_KEY");
//!
//!     let sent = client.send_sms("+381617581234", "hello").await;
//!     if !sent.ok {
//!         eprintln!("{}: {}", sent.status, sent.message);
//!     }
//!
//!     client
//!         .send_verification("+381617581234", VerificationOptions::default())
//!         .await;
//!     let checked = client.verify_code("+381617581234", "1234").await;
//!     println!("valid: {}", checked.valid);
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{FailureEnvelope, TextFlowClient, TextFlowClientBuilder, TextFlowError};
pub use domain::{
    ApiKey, ApiResult, CodeLength, MessageText, PhoneNumber, ProviderName,
    RawPhoneNumber, SendMessageData, SendSms, SendVerification, ValidationError,
    ValidityMinutes, VerificationCode, VerificationOptions, VerifyCode, VerifyCodeResult,
    VerifyPhoneData,
};
pub use transport::TransportError;
