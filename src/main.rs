use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::sync::watch;

use feedcast::config::Config;
use feedcast::engine::PollEngine;
use feedcast::feed::HttpFetcher;
use feedcast::notify::WebhookNotifier;
use feedcast::scheduler::Scheduler;
use feedcast::store::{Database, SubscriptionStore};
use feedcast::util::validate_url;

/// Get the default config file path (~/.config/feedcast/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("feedcast")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "feedcast", about = "Polls subscribed feeds and fans out new entries to subscribers")]
struct Args {
    /// Path to the config file (defaults to ~/.config/feedcast/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the polling daemon until interrupted
    Run,
    /// Subscribe a destination to a feed URL
    Subscribe { subscriber: String, url: String },
    /// Remove a subscription (no-op if it does not exist)
    Unsubscribe { subscriber: String, url: String },
    /// List the feed URLs a destination follows
    Subscriptions { subscriber: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path).context("Failed to load configuration")?;

    let db = Database::open(&config.database_path)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database_path))?;

    match args.command {
        Command::Run => run_daemon(config, db).await,
        Command::Subscribe { subscriber, url } => {
            let url = validate_url(&url).context("Refusing to subscribe")?;
            db.add_subscription(&subscriber, url.as_str())
                .await
                .context("Failed to add subscription")?;
            println!("Subscribed {} to {}", subscriber, url);
            Ok(())
        }
        Command::Unsubscribe { subscriber, url } => {
            db.remove_subscription(&subscriber, &url)
                .await
                .context("Failed to remove subscription")?;
            println!("Unsubscribed {} from {}", subscriber, url);
            Ok(())
        }
        Command::Subscriptions { subscriber } => {
            let urls = db
                .list_subscriptions(&subscriber)
                .await
                .context("Failed to list subscriptions")?;
            if urls.is_empty() {
                println!("{} has no subscriptions", subscriber);
            } else {
                for url in urls {
                    println!("{}", url);
                }
            }
            Ok(())
        }
    }
}

async fn run_daemon(config: Config, db: Database) -> Result<()> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("feedcast/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let fetcher = HttpFetcher::with_limits(
        client.clone(),
        config.fetch_timeout(),
        config.max_feed_size_bytes,
    );
    let notifier = WebhookNotifier::new(client, config.webhook_url.clone());
    let engine = PollEngine::new(db, fetcher, notifier);
    let scheduler = Scheduler::new(config.poll_interval());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping after current cycle");
            let _ = shutdown_tx.send(true);
        }
    });

    scheduler.run(&engine, shutdown_rx).await;
    Ok(())
}
