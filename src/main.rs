//! tubestream - resolve a video into a playable audio stream descriptor
//!
//! Prints the descriptor a downstream player would be handed, as JSON.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tubestream::{MetadataSource, ResolverSettings, VideoMetadata, WatchPageSource};

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Video URL or id
    url: Option<String>,

    /// Resolve a pre-fetched info document instead of fetching
    #[arg(long, conflicts_with = "url")]
    info_file: Option<PathBuf>,

    /// Audio ladder index (0 = lowest); defaults to the highest
    #[arg(long, allow_negative_numbers = true)]
    quality: Option<i64>,

    /// Proxy URL, may be repeated
    #[arg(long = "proxy")]
    proxies: Vec<String>,

    /// Settings file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    let config_path = args.config.unwrap_or_else(ResolverSettings::default_path);
    let settings = ResolverSettings::load_or_default(&config_path).await?;
    let options = settings.stream_options(args.quality, args.proxies);

    let descriptor = match (args.info_file, args.url) {
        (Some(path), _) => {
            let metadata = VideoMetadata::load(&path).await?;
            tubestream::stream_from_info(&metadata, &options)?
        }
        (None, Some(url)) => {
            let source = WatchPageSource::new(settings);
            if !source.supports(&url) {
                bail!("Unsupported URL: {}", url);
            }
            tubestream::stream(&source, &url, &options).await?
        }
        (None, None) => bail!("Provide a video URL or --info-file"),
    };

    let json = serde_json::to_string_pretty(&descriptor).context("Failed to serialize descriptor")?;
    println!("{}", json);

    Ok(())
}
