use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slugway::config::Config;
use slugway::links::{AdminContext, LinkAdmin};
use slugway::models::timestamp::{parse_rfc3339, to_rfc3339};
use slugway::storage;

#[derive(Parser)]
#[command(name = "slugway-admin")]
#[command(about = "Slugway link management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all links, newest first
    List,
    /// Set or clear the expiry of a link
    Expire {
        /// Link ID
        id: i64,
        /// Expiry instant (RFC 3339, e.g. 2030-01-01T00:00:00Z)
        #[arg(long, conflicts_with = "never", required_unless_present = "never")]
        at: Option<String>,
        /// Make the link permanent
        #[arg(long)]
        never: bool,
    },
    /// Delete a link
    Delete {
        /// Link ID
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let storage = storage::connect(&config.database).await?;
    storage.init().await?;

    let admin = LinkAdmin::new(storage);
    // Local shell access to the database is the authorization here.
    let ctx = AdminContext::granted();

    match cli.command {
        Commands::List => {
            let links = admin.list_all(&ctx).await?;
            if links.is_empty() {
                println!("No links found");
                return Ok(());
            }

            println!(
                "{:<6} {:<20} {:>8} {:<26} {}",
                "ID", "SLUG", "CLICKS", "EXPIRES", "DESTINATION"
            );
            for link in links {
                let expires = link
                    .expires_at
                    .and_then(to_rfc3339)
                    .unwrap_or_else(|| "never".to_string());
                println!(
                    "{:<6} {:<20} {:>8} {:<26} {}",
                    link.id, link.slug, link.clicks, expires, link.original_url
                );
            }
        }
        Commands::Expire { id, at, never } => {
            let expires_at = if never {
                None
            } else {
                let raw = at.context("--at or --never is required")?;
                Some(parse_rfc3339(&raw).with_context(|| format!("invalid timestamp '{raw}'"))?)
            };

            admin.update_expiry(&ctx, id, expires_at).await?;
            match expires_at.and_then(to_rfc3339) {
                Some(at) => println!("✓ Link {} expires at {}", id, at),
                None => println!("✓ Link {} is now permanent", id),
            }
        }
        Commands::Delete { id } => {
            admin.delete(&ctx, id).await?;
            println!("✓ Link {} deleted", id);
        }
    }

    Ok(())
}
