use clap::Parser;
use futures_util::future::join_all;
use reqwest::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tools::{DEFAULT_PURGE_BASE, PurgeResult, PurgeSummary, purge_urls};

#[derive(Parser, Debug)]
#[command(author, version, about = "Purge the waypoint images from the jsDelivr cache")]
struct Args {
    /// Purge endpoint for the image repository
    #[arg(long, env = "CORUMAP_PURGE_BASE", default_value = DEFAULT_PURGE_BASE)]
    purge_base: String,

    /// Number of waypoints
    #[arg(long, default_value_t = 10)]
    locations: u32,

    /// Images per waypoint
    #[arg(long, default_value_t = 3)]
    images: usize,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Exit non-zero when any purge fails
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main(Args::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main(args: Args) -> Result<(), String> {
    let client = Client::builder()
        .build()
        .map_err(|e| format!("http client: {e}"))?;

    let urls = purge_urls(&args.purge_base, args.locations, args.images);
    info!(count = urls.len(), base = %args.purge_base, "purging cached images");

    let results = join_all(urls.into_iter().map(|url| purge_one(&client, url))).await;
    let summary = PurgeSummary::from_results(&results);

    if args.json {
        let out = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        println!("purged {}/{}", summary.purged, summary.total);
    }
    info!(purged = summary.purged, failed = summary.failed.len(), "purge finished");

    if args.strict && !summary.all_ok() {
        return Err(format!("{} purge request(s) failed", summary.failed.len()));
    }
    Ok(())
}

async fn purge_one(client: &Client, url: String) -> PurgeResult {
    match client.post(&url).send().await {
        Ok(resp) => {
            let status = resp.status();
            if !status.is_success() {
                warn!(%url, %status, "purge rejected");
            }
            PurgeResult {
                url,
                ok: status.is_success(),
                detail: status.to_string(),
            }
        }
        Err(err) => {
            warn!(%url, error = %err, "purge request failed");
            PurgeResult {
                url,
                ok: false,
                detail: err.to_string(),
            }
        }
    }
}
