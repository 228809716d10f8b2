//! Inserts one login credential with an Argon2 hashed password.
//!
//! Reads `CONNECTION_URL` (and `.env`) like the server does.

use clap::Parser;
use paygate::config::Config;
use paygate::db::Storage;
use paygate::service::credentials::seed_credential;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "seed_credential", about = "Create a login credential")]
struct Args {
    /// Login name to create.
    #[arg(long)]
    username: String,

    /// Plaintext password; hashed before it is stored.
    #[arg(long, env = "SEED_PASSWORD", hide_env_values = true)]
    password: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: CONNECTION_URL environment variable is not set or invalid ({e}).");
            std::process::exit(1);
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let storage = Storage::connect(&cfg.connection_url).await?;
    info!("database connected");

    seed_credential(&storage, &args.username, &args.password).await?;
    let count = storage.count_credentials(&args.username).await?;
    if count > 1 {
        warn!(
            username = %args.username,
            count,
            "username now has several credentials; login uses the oldest"
        );
    }

    storage.pool().close().await;
    Ok(())
}
