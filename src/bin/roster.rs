//! Roster CLI - enrollment client for the rosterd daemon
//!
//! # Usage
//!
//! ```text
//! roster list                                    # Show every activity and its roster
//! roster signup "Chess Club" student@example.com # Join an activity
//! roster unregister "Chess Club" student@example.com
//! roster watch                                   # Follow enrollment changes live
//! roster ping                                    # Check the daemon is up
//! ```

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use roster_cli::{
    render_activities, render_change, ClientConfig, DaemonClient, DEFAULT_SOCKET_PATH,
};

// ============================================================================
// CLI Arguments
// ============================================================================

/// Roster CLI - activity enrollment client
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(about = "Manage extracurricular activity enrollment")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Daemon socket path (default: $ROSTERD_SOCKET or /tmp/rosterd.sock)
    #[arg(long, global = true)]
    socket: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every activity with schedule, capacity, and participants
    List,
    /// Sign a participant up for an activity
    Signup {
        /// Activity name, exactly as listed
        activity: String,
        /// Participant email
        email: String,
    },
    /// Remove a participant from an activity
    Unregister {
        /// Activity name, exactly as listed
        activity: String,
        /// Participant email
        email: String,
    },
    /// Follow enrollment changes as they happen
    Watch,
    /// Check that the daemon is reachable
    Ping,
}

fn socket_path(args: &Args) -> PathBuf {
    args.socket
        .clone()
        .or_else(|| env::var_os("ROSTERD_SOCKET").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET_PATH))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let client = DaemonClient::new(ClientConfig {
        socket_path: socket_path(&args),
    });

    match args.command {
        Command::List => {
            let activities = client.list_activities().await?;
            print!("{}", render_activities(&activities));
        }
        Command::Signup { activity, email } => {
            let message = client.signup(&activity, &email).await?;
            println!("{message}");
        }
        Command::Unregister { activity, email } => {
            let message = client.unregister(&activity, &email).await?;
            println!("{message}");
        }
        Command::Watch => {
            client
                .watch(
                    |activities| print!("{}", render_activities(activities)),
                    |change| println!("{}", render_change(change)),
                )
                .await?;
        }
        Command::Ping => {
            let seq = client.ping(1).await?;
            println!("Daemon is up (pong {seq})");
        }
    }

    Ok(())
}
