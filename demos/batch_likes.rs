//! Sending likes to several players, two seconds apart.
//!
//! The endpoint needs a plan with a daily limit above 500 requests; lower
//! plans get a 403.
//!
//! Run with: `COGNIMA_API_KEY=ck_... cargo run --example batch_likes -- 1033857091 1234567890`

use cognima::endpoints::LikesOutcome;
use cognima::{Client, ClientError};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("cognima=info,batch_likes=info")
        .init();

    let client = Client::from_env()?;
    let freefire = client.freefire();

    let info = freefire.info().await?;
    println!("Service: {}", info.data.service);
    println!("Min likes required: {}", info.data.rules.min_likes);
    println!();

    let player_ids: Vec<String> = std::env::args().skip(1).collect();
    if player_ids.is_empty() {
        println!("Pass one or more player ids");
        return Ok(());
    }

    if let [single] = player_ids.as_slice() {
        match freefire.send_likes(single).await {
            Ok(response) => match response.data {
                LikesOutcome::Counted(report) | LikesOutcome::NotCounted(report) => {
                    println!(
                        "{:?}: {:?} -> {:?} (+{}), counted: {}",
                        report.player,
                        report.initial_likes,
                        report.final_likes,
                        report.likes_added,
                        report.usage_counted
                    );
                }
                LikesOutcome::Rejected {
                    error_code,
                    message,
                    report,
                } => {
                    println!("Rejected ({:?}): {}", error_code, message);
                    if let Some(report) = report {
                        println!(
                            "  Likes added: {} (less than {:?} required)",
                            report.likes_added, report.min_likes_required
                        );
                    }
                }
            },
            Err(ClientError::ClientSide { status, .. }) if status.as_u16() == 403 => {
                println!("Access denied: this plan cannot use the likes service");
            }
            Err(e) => println!("Error: {}", e),
        }
        return Ok(());
    }

    let summary = freefire
        .send_likes_to_players(player_ids, Duration::from_secs(2))
        .await;

    println!("=== Summary ===");
    println!("Successful (counted): {}", summary.successful.len());
    println!("Successful (not counted): {}", summary.not_counted.len());
    println!("Failed: {}", summary.failed.len());

    Ok(())
}
