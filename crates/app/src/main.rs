//! Forday API client - Main Entry Point
//!
//! Command line front end: manages the stored credential pair and sends
//! authenticated requests, refreshing the pair when it expires.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use forday::ForDayClient;
use forday_application::{RefreshOutcome, SessionEvent, SessionState, TerminationReason};
use forday_infrastructure::SettingsRepository;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Forday API client.
#[derive(Debug, Parser)]
#[command(name = "forday", version, about)]
struct Cli {
    /// Settings file (defaults to the platform config directory).
    #[arg(long, global = true, env = "FORDAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store the credential pair issued at login.
    Login {
        /// Access token.
        #[arg(long)]
        access_token: String,
        /// Refresh token.
        #[arg(long)]
        refresh_token: String,
    },
    /// Delete the stored credentials.
    Logout,
    /// Show whether a credential pair is stored.
    Status,
    /// Exchange the refresh token for a new pair now.
    Refresh,
    /// Send an authenticated GET to a path under the base URL.
    Get {
        /// Path, e.g. `/users/me`.
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let repository = cli
        .config
        .map_or_else(SettingsRepository::new, SettingsRepository::with_path);
    let settings = repository.load().await?;
    let client = ForDayClient::from_settings(settings)?;

    let mut events = client.subscribe();
    let result = run(&client, cli.command).await;

    while let Ok(event) = events.try_recv() {
        if let SessionEvent::Terminated { reason } = event
            && reason != TerminationReason::SignedOut
        {
            eprintln!("Session ended ({reason:?}). Sign in again with `forday login`.");
        }
    }

    result
}

async fn run(client: &ForDayClient, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Login {
            access_token,
            refresh_token,
        } => {
            client.sign_in(access_token, refresh_token).await?;
            println!("Signed in.");
        }
        Command::Logout => {
            client.sign_out().await?;
            println!("Signed out.");
        }
        Command::Status => match client.status().await? {
            SessionState::SignedIn { access_preview } => {
                println!("Signed in (access token {access_preview})");
            }
            SessionState::SignedOut => println!("Signed out."),
        },
        Command::Refresh => match client.refresh().await {
            RefreshOutcome::Refreshed => println!("Credentials refreshed."),
            RefreshOutcome::SessionTerminated => {
                return Err("refresh failed; session terminated".into());
            }
            RefreshOutcome::Abandoned => return Err("refresh abandoned".into()),
        },
        Command::Get { path } => {
            let response = client.get(&path).await?;
            println!("{}", response.status);
            println!("{}", response.body_as_string_lossy());
        }
    }

    Ok(())
}
