//! Basic usage example for the CloudKey API
//!
//! This example demonstrates:
//! - Checking who we are logged in as
//! - Creating a media
//! - Setting, listing and removing metadata
//! - Requesting an upload URL and uploading a file
//! - Deleting the media
//!
//! Run with: cargo run --example basic_usage -- --username me --password secret

use clap::Parser;
use cloudkey_client::{CloudKey, Config, Credentials, SetMetaRequest, UploadOptions};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "basic_usage")]
#[command(about = "Walk through the CloudKey media API")]
struct Args {
    /// API base URL
    #[arg(long, default_value = "https://api.dmcloud.net", env = "CLOUDKEY_URL")]
    url: String,

    /// Account username
    #[arg(short, long, env = "CLOUDKEY_USERNAME")]
    username: String,

    /// Account password
    #[arg(short, long, env = "CLOUDKEY_PASSWORD", hide_env_values = true)]
    password: String,

    /// Optional file to upload
    #[arg(long)]
    file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, env = "CLOUDKEY_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("cloudkey_client={},basic_usage={}", log_level, log_level).into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("🚀 CloudKey - Basic Usage Example\n");

    let cloudkey = CloudKey::with_config(
        Config::new(&args.url),
        Credentials::new(&args.username, &args.password),
    )?;

    // ==================== User ====================

    let me = cloudkey.user().whoami().await?;
    println!("👤 Logged in as {} ({})", me.username, me.id);

    // ==================== Media ====================

    println!("\n📦 Creating a media...");
    let media = cloudkey.media().create().await?;
    println!("   ✅ Created {}", media.id);

    // ==================== Metadata ====================

    println!("\n🏷️  Setting metadata...");
    for (key, value) in [("title", "Holidays"), ("author", "me"), ("year", "2010")] {
        cloudkey
            .media()
            .set_meta(SetMetaRequest::new(&media.id).key(key).value(value))
            .await?;
    }

    let meta = cloudkey.media().list_meta(&media.id).await?;
    for (key, entry) in &meta {
        println!("   - {} = {}", key, entry.value);
    }

    cloudkey.media().remove_meta(&media.id, "year").await?;
    match cloudkey.media().get_meta(&media.id, "year").await {
        Ok(entry) => println!("   ⚠️  'year' still present: {}", entry.value),
        Err(e) if e.is_not_found() => println!("   ✅ 'year' removed"),
        Err(e) => return Err(e.into()),
    }

    // ==================== Upload ====================

    println!("\n📤 Requesting an upload URL...");
    let ticket = cloudkey
        .file()
        .upload_with(UploadOptions::new().with_target("http://www.example.com/myform"))
        .await?;
    println!("   URL:    {}", ticket.url);
    println!("   seal:   {}", ticket.seal().unwrap_or_default());
    println!("   uuid:   {}", ticket.uuid().unwrap_or_default());
    println!("   target: {}", ticket.target().unwrap_or_default());

    if let Some(path) = &args.file {
        println!("\n📤 Uploading {}...", path.display());
        let uploaded = cloudkey.file().upload_file(path).await?;
        println!(
            "   ✅ {} ({} bytes) -> {}",
            uploaded.name.as_deref().unwrap_or("?"),
            uploaded.size.unwrap_or(0),
            uploaded.id
        );
    }

    // ==================== Cleanup ====================

    println!("\n🗑️  Deleting {}...", media.id);
    cloudkey.media().delete(&media.id).await?;
    match cloudkey.media().info(&media.id).await {
        Err(e) if e.is_not_found() => println!("   ✅ Deleted"),
        Err(e) => return Err(e.into()),
        Ok(_) => println!("   ⚠️  Media still exists"),
    }

    println!("\n🎉 Done!");
    Ok(())
}
