//! `guestbook` — command-line client for the guestbook API.
//!
//! # Usage
//!
//! ```
//! guestbook --url http://localhost:8787 list
//! guestbook post --name Sam --message "Congrats!"
//! guestbook --config ~/.config/guestbook/config.toml list
//! ```

mod client;
mod time_ago;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use client::ApiClient;
use guestbook_core::greeting::Greeting;
use serde::Deserialize;
use time_ago::format_time_ago;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8787";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "guestbook", about = "Read and sign the wedding guestbook")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the guestbook server (default: http://localhost:8787).
  #[arg(long, env = "GUESTBOOK_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show the latest greetings, newest first.
  List,
  /// Sign the guestbook.
  Post {
    #[arg(long)]
    name:    String,
    #[arg(long)]
    message: String,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string());
  tracing::debug!(%base_url, "using guestbook server");

  let client = ApiClient::new(base_url)?;

  match args.command {
    Command::List => {
      let greetings = client.list_greetings().await?;
      if greetings.is_empty() {
        println!("No greetings yet. Be the first!");
      }
      let now = Utc::now().timestamp_millis();
      for greeting in &greetings {
        print_greeting(greeting, now);
      }
    }
    Command::Post { name, message } => {
      let greeting = client.post_greeting(&name, &message).await?;
      println!("Thank you! Your greeting was saved as #{}.", greeting.id);
      print_greeting(&greeting, Utc::now().timestamp_millis());
    }
  }

  Ok(())
}

fn print_greeting(greeting: &Greeting, now_ms: i64) {
  println!(
    "{} · {}\n  {}\n",
    greeting.name,
    format_time_ago(now_ms, greeting.timestamp),
    greeting.message
  );
}
