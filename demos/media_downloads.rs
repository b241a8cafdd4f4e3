//! Resolving media links across platforms.
//!
//! Run with: `COGNIMA_API_KEY=ck_... cargo run --example media_downloads`

use cognima::endpoints::{best_media, best_quality, MediaKind, Platform};
use cognima::Client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("cognima=info,media_downloads=info")
        .init();

    let client = Client::from_env()?;
    let media = client.media();

    println!("=== Single platform ===");
    let vimeo = "https://vimeo.com/76979871";
    let video = media.download(Platform::Vimeo, vimeo).await?;
    println!("Title: {:?}", video.data.title);
    println!("Author: {:?}", video.data.author);
    println!("Download: {:?}", video.data.download_url);

    if Platform::Vimeo.has_formats() {
        let formats = media.formats(Platform::Vimeo, vimeo).await?;
        for format in &formats.data {
            println!(
                "  {} {} {}",
                format.format_id,
                format.quality.as_deref().unwrap_or("?"),
                format.ext.as_deref().unwrap_or("?")
            );
        }
    }
    println!();

    println!("=== Any platform ===");
    let all = media
        .all_media("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .await?;
    println!(
        "{:?} on {:?}: {} items",
        all.data.metadata.title, all.data.metadata.platform, all.data.total_items
    );
    match best_media(&all.data.media) {
        Some(best) => println!("Best: {:?} {}", best.quality, best.url),
        None => println!("Nothing flagged as best"),
    }

    let audio = media
        .all_media_by_kind("https://www.youtube.com/watch?v=dQw4w9WgXcQ", MediaKind::Audio)
        .await?;
    println!("Audio streams: {}", audio.data.media.len());
    println!();

    println!("=== Facebook ===");
    let videos = media
        .facebook_qualities("https://www.facebook.com/watch/?v=1234567890")
        .await?;
    if let Some(video) = best_quality(&videos.data) {
        println!("Picked {} -> {:?}", video.resolution, video.url);
    }
    println!();

    println!("=== File hosts ===");
    let file = client
        .files()
        .mediafire_info("https://www.mediafire.com/file/abc123/file.zip/file")
        .await?;
    println!(
        "{} ({})",
        file.data.file_name,
        file.data.file_size.as_deref().unwrap_or("unknown size")
    );
    println!(
        "Redirect link: {}",
        client
            .files()
            .mediafire_redirect_url("https://www.mediafire.com/file/abc123/file.zip/file")
    );

    Ok(())
}
