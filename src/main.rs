use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gemini_adapter::app::App;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gemini-adapter")]
#[command(about = "Send structured conversation context to Google Gemini")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the available model descriptors as JSON.
    Models,
    /// Send a JSON array of context items and print the reply items as JSON.
    Send {
        /// Model display name or API version.
        #[arg(short, long, default_value = "gemini-2.5-flash")]
        model: String,
        /// Read the context from this file instead of stdin.
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
}

fn read_context(file: Option<&PathBuf>) -> Result<Vec<Value>> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read context from stdin")?;
            buffer
        }
    };
    serde_json::from_str(&raw).context("Context must be a JSON array of items")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_adapter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let app = App::new()?;

    match args.command {
        Command::Models => {
            println!("{}", serde_json::to_string_pretty(app.models())?);
            Ok(())
        }
        Command::Send { model, file } => {
            let context = read_context(file.as_ref())?;
            match app.send(&model, &context).await {
                Ok(items) => {
                    info!("Received {} items", items.len());
                    println!("{}", serde_json::to_string_pretty(&items)?);
                    Ok(())
                }
                Err(e) => {
                    error!("Request failed: {}", e);
                    println!("{}", serde_json::to_string_pretty(&e.into_item())?);
                    std::process::exit(1);
                }
            }
        }
    }
}
