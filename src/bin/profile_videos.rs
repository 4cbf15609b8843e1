#![forbid(unsafe_code)]

//! Prints the videos a user or project profile would show.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use profile_videos::config::{FeedOverrides, resolve_feed_settings};
use profile_videos::roster::Roster;
use profile_videos::{VideoFeed, VideoRecord};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Parser)]
#[command(
    name = "profile_videos",
    about = "List the feed videos shown on a user or project profile"
)]
struct Cli {
    /// Env file with VIDEO_FEED_* settings.
    #[arg(long)]
    env_file: Option<PathBuf>,
    /// Roster of users and projects (TOML).
    #[arg(long)]
    roster: Option<PathBuf>,
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
    /// `user` or `project`.
    kind: String,
    slug: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = resolve_feed_settings(FeedOverrides {
        base_url: cli.base_url.clone(),
        timeout_secs: cli.timeout_secs,
        roster_path: cli.roster.clone(),
        env_path: cli.env_file.clone(),
    })?;
    let roster = Roster::load(&settings.roster_path)?;
    let subject = roster.subject(&cli.kind, &cli.slug)?;

    let feed = VideoFeed::from_settings(&settings);
    let videos = feed
        .videos_for(&subject)
        .with_context(|| format!("Fetching videos for {} {}", cli.kind, cli.slug))?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&videos)?),
        OutputFormat::Text => println!("{}", render_text(&videos)),
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render_text(videos: &[VideoRecord]) -> String {
    if videos.is_empty() {
        return "No videos found".to_string();
    }
    videos
        .iter()
        .map(|video| {
            format!(
                "{}  {}  {}  {}",
                video.published.format("%Y-%m-%d"),
                video.author,
                video.title,
                video.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
