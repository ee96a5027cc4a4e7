use anyhow::Result;
use clap::{Parser, Subcommand};

use backtalk::config::Config;
use backtalk::output;
use backtalk::task::{FetchReplies, RunArgs, Task};
use backtalk::twitter::client::TwitterClient;

/// Backtalk: fetch the direct replies to a tweet.
///
/// Searches the most recent mentions of a user and keeps the candidates
/// that reply to the given tweet id.
#[derive(Parser)]
#[command(name = "backtalk", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the direct replies to a tweet
    Replies {
        /// Handle whose mentions are searched (without the leading @)
        #[arg(long)]
        user: String,

        /// Tweet id whose replies to collect
        #[arg(long)]
        tweet_id: String,

        /// Page size requested from the search endpoint (max 100)
        #[arg(long, default_value = "100")]
        count: u32,

        /// Resolve credentials from this named secret instead of the
        /// TWITTER_* variables (deprecated)
        #[arg(long)]
        secret: Option<String>,

        /// Print the replies as JSON instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Verify the configured credentials and print the authenticated account
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("backtalk=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replies {
            user,
            tweet_id,
            count,
            secret,
            json,
        } => {
            let config = Config::load()?;

            let mut task = FetchReplies::new()
                .with_count(count)
                .with_base_url(&config.api_base_url);
            if let Some(timeout) = config.http_timeout {
                task = task.with_timeout(timeout);
            }

            let args = RunArgs {
                user: Some(user),
                tweet_id: Some(tweet_id.clone()),
                credentials: config.credentials(),
                credentials_secret: secret,
            };

            let replies = task.run(args).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&replies)?);
            } else {
                output::display_replies(&tweet_id, &replies);
            }
        }

        Commands::Whoami => {
            let config = Config::load()?;
            let credentials = config.require_credentials()?;

            let client =
                TwitterClient::with_options(&credentials, &config.api_base_url, config.http_timeout)?;
            let me = client.verify_credentials().await?;

            println!("Authenticated as @{} ({})", me.screen_name, me.id_str);
        }
    }

    Ok(())
}
