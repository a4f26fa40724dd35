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
    let code = std::env::var("TEXTFLOW_CODE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TEXTFLOW_CODE environment variable is required",
        )
    })?;

    let client = TextFlowClient::new();
    client.set_key(api_key);

    let result = client.verify_code(phone, code).await;
    if result.valid {
        println!("code is valid");
    } else {
        println!(
            "code rejected (status: {}, message: {})",
            result.status, result.message
        );
    }

    Ok(())
}
