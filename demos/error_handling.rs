//! Example demonstrating error handling.
//!
//! This example shows how to:
//! - Tell transport, HTTP and service-level failures apart
//! - Access raw response data on errors
//! - Read rate limit headers from a rejected request
//! - Deal with payloads that don't match the expected shape
//!
//! Run with: `COGNIMA_API_KEY=ck_... cargo run --example error_handling`

use cognima::endpoints::Platform;
use cognima::{Auth, Client, ClientError, RequestDescriptor, DEFAULT_BASE_URL};
use serde::Deserialize;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("cognima=info")
        .init();

    let client = Client::from_env()?;

    println!("=== Example 1: Service-level failure ===");
    // A URL the platform cannot resolve: the service answers 2xx with `success: false`
    match client
        .media()
        .download(Platform::Reddit, "https://reddit.com/not-a-post")
        .await
    {
        Ok(response) => println!("Success: {:?}", response.data.title),
        Err(ClientError::Api {
            error_code,
            message,
            http_status,
        }) => {
            println!("Service refused the request");
            println!("  Code: {:?}", error_code);
            println!("  Message: {}", message);
            println!("  HTTP status: {:?}", http_status);
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 2: Handling HTTP errors ===");
    let unauthenticated = Client::builder()
        .base_url(DEFAULT_BASE_URL)?
        .auth(Auth::header("X-API-Key", "ck_invalid"))
        .build()?;

    match unauthenticated.status().key().await {
        Ok(_) => println!("Unexpectedly accepted"),
        Err(ClientError::ClientSide {
            status,
            body,
            rate_limit_info,
            ..
        }) => {
            println!("HTTP Error!");
            println!("  Status code: {}", status.as_u16());
            println!("  Raw response: {}", body);
            if let Some(info) = rate_limit_info {
                println!("  Rate limited, wait {:?}", info.wait_time(Duration::from_secs(60)));
            }
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 3: Handling decode errors ===");
    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct WrongSchema {
        nonexistent_field: String,
    }

    match client.get::<WrongSchema>("/status").await {
        Ok(_) => println!("Unexpected success"),
        Err(ClientError::Decode {
            raw_response,
            serde_error,
            status,
        }) => {
            println!("Decode failed (status {})", status);
            println!("  Error: {}", serde_error);
            println!("  Raw response: {:.200}", raw_response);
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 4: Timeouts ===");
    let descriptor = RequestDescriptor::get("/alldl")
        .with_query_param("url", "https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .with_timeout(Duration::from_millis(1));

    match client.request(descriptor).await {
        Ok(_) => println!("Answered within 1ms"),
        Err(e) if e.is_timeout() => println!("Timed out: {}", e),
        Err(e) => println!("Other error: {}", e),
    }

    Ok(())
}
