//! Basic example: configure a client and make a few calls.
//!
//! This example shows how to:
//! - Build a client from `COGNIMA_*` environment variables (a `.env` file works too)
//! - Send a raw request and inspect the envelope
//! - Use a typed endpoint wrapper
//! - Access response metadata
//!
//! Run with: `COGNIMA_API_KEY=ck_... cargo run --example basic_call`

use cognima::{Client, Payload, RequestDescriptor, ResponseEnvelope};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("cognima=debug,basic_call=info")
        .init();

    let client = Client::from_env()?;
    println!("Base URL: {}", client.base_url());
    println!("Auth: {:?}", client.auth_style());
    println!();

    println!("=== Raw request ===");
    let response = client.request(RequestDescriptor::get("/status")).await?;

    match &response.data {
        Payload::Envelope(ResponseEnvelope::Success { data, .. }) => {
            println!("Key name: {}", data["api_key"]["name"]);
        }
        Payload::Envelope(ResponseEnvelope::Failure {
            error_code,
            message,
            ..
        }) => {
            println!("Service said no ({:?}): {}", error_code, message);
        }
        Payload::Binary(binary) => println!("Unexpected {} bytes", binary.len()),
    }
    println!("Status code: {}", response.status);
    println!("Request latency: {:?}", response.latency);
    println!();

    println!("=== Typed request ===");
    let status = client.status().key().await?;
    let today = &status.data.usage.today;
    println!("Requests today: {}", today.requests);
    println!("Tokens today: {}", today.total_tokens);
    println!("Estimated cost: ${:.4}", today.estimated_cost);
    match status.data.limits.hourly.remaining {
        Some(remaining) => println!("Hourly requests left: {}", remaining),
        None => println!("Hourly requests left: unlimited"),
    }

    let models = client.status().models(Some(7)).await?;
    println!(
        "Last 7 days: {} requests across {} models",
        models.data.summary.total_requests, models.data.summary.total_models
    );

    Ok(())
}
