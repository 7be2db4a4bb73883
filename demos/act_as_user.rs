//! Impersonation example
//!
//! Shows how `act_as_user` changes the identity of every following call,
//! and how an unknown target is reported on first use.
//!
//! Run with: cargo run --example act_as_user -- --username root --password secret --act-as bob

use clap::Parser;
use cloudkey_client::{CloudKey, Config, Credentials, ErrorKind};

#[derive(Parser, Debug)]
#[command(name = "act_as_user")]
#[command(about = "Impersonate another CloudKey user")]
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

    /// User to impersonate
    #[arg(long, env = "CLOUDKEY_ACT_AS")]
    act_as: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut cloudkey = CloudKey::with_config(
        Config::new(&args.url),
        Credentials::new(&args.username, &args.password),
    )?;

    let me = cloudkey.user().whoami().await?;
    println!("👤 Authenticated as {}", me.username);

    cloudkey.act_as_user(&args.act_as);
    match cloudkey.user().whoami().await {
        Ok(user) if user.username == args.act_as => {
            println!("🔁 Now acting as {}", user.username)
        }
        Ok(user) => println!(
            "ℹ️  Still {} - impersonation needs a privileged account",
            user.username
        ),
        Err(e) if e.kind() == Some(ErrorKind::AuthenticationFailed) => {
            println!("❌ Cannot act as {}: {}", args.act_as, e)
        }
        Err(e) => return Err(e.into()),
    }

    cloudkey.act_as_self();
    let me = cloudkey.user().whoami().await?;
    tracing::info!(username = %me.username, "Back to own identity");

    Ok(())
}
