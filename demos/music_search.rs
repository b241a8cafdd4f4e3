//! Searching Spotify and SoundCloud, and saving a track to disk.
//!
//! Run with: `COGNIMA_API_KEY=ck_... cargo run --example music_search`

use cognima::Client;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("cognima=info,music_search=info")
        .init();

    let client = Client::from_env()?;
    let music = client.music();

    println!("=== Spotify search ===");
    let found = music.spotify_search("Imagine Dragons", Some(5)).await?;
    for track in &found.data.results {
        println!("  {} - {} ({})", track.name, track.artists, track.link);
    }
    println!();

    println!("=== Several searches, 500ms apart ===");
    let queries = ["Bohemian Rhapsody", "Stairway to Heaven", "Hotel California"];
    let results = music
        .spotify_search_many(queries, Some(1), Duration::from_millis(500))
        .await;
    for (query, result) in queries.iter().zip(results) {
        match result {
            Ok(response) => match response.data.results.first() {
                Some(track) => println!("  {}: {} by {}", query, track.name, track.artists),
                None => println!("  {}: nothing found", query),
            },
            Err(e) => println!("  {}: {}", query, e),
        }
    }
    println!();

    println!("=== Spotify download ===");
    let track = music.spotify_search_one("Bohemian Rhapsody Queen").await?;
    let file = music.spotify_download(&track.data.link).await?;
    let filename = file.data.filename().unwrap_or("track.mp3").to_string();
    tokio::fs::write(&filename, &file.data.bytes).await?;
    println!("Saved {} bytes to {}", file.data.len(), filename);
    println!();

    println!("=== SoundCloud ===");
    let found = music.soundcloud_search_download("lofi hip hop").await?;
    println!(
        "{} ({} plays)",
        found.data.track.title,
        found.data.track.playback_count.unwrap_or_default()
    );
    println!("Download: {}", found.data.download.download_url);

    Ok(())
}
