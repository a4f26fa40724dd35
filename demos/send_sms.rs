use std::io;

use textflow::TextFlowClient;
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
    let message = std::env::var("TEXTFLOW_MESSAGE")
        .unwrap_or_else(|_| "Hello from the textflow demo.".to_owned());

    let client = TextFlowClient::with_key(api_key);
    client
        .send_sms_with(phone, message, |result| {
            println!(
                "ok: {}, status: {}, message: {}",
                result.ok, result.status, result.message
            );
            if let Some(data) = result.data {
                println!(
                    "to: {:?}, country: {:?}, price: {:?}, timestamp: {:?}",
                    data.to(),
                    data.country_code(),
                    data.price(),
                    data.timestamp()
                );
            }
        })
        .await;

    Ok(())
}
