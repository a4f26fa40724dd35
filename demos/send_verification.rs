use std::io;

use textflow::{
    CodeLength, PhoneNumber, ProviderName, RawPhoneNumber, SendVerification, TextFlowClient,
    ValidityMinutes, VerificationOptions,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let api_key = std::env::var("TEXTFLOW_API_KEY").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TEXTFLOW_API_KEY environment variable is required",
        )
    })?;
    let phone = std::env::var("TEXTFLOW_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TEXTFLOW_PHONE environment variable is required",
        )
    })?;

    let mut options = VerificationOptions::default()
        .minutes(ValidityMinutes::new(10)?)
        .code_length(CodeLength::new(6)?);
    if let Ok(provider) = std::env::var("TEXTFLOW_PROVIDER") {
        options = options.provider(ProviderName::new(provider)?);
    }

    // Without a default region the number must start with its `+` calling code.
    let phone = PhoneNumber::parse(None, phone)?;
    println!("sending to {} (+{})", phone.e164(), phone.calling_code());
    let request = SendVerification::from_parts(RawPhoneNumber::from(phone), options);

    let client = TextFlowClient::with_key(api_key);
    let result = client.send_verification_request(request).await;
    println!(
        "ok: {}, status: {}, message: {}",
        result.ok, result.status, result.message
    );
    if let Some(data) = result.data {
        println!(
            "message text: {:?}, expires: {:?}",
            data.message_text(),
            data.expires()
        );
    }

    Ok(())
}
