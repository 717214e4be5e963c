//! goma-news — one digest run per invocation.
//! Fetch feeds, filter, annotate new items, write the HTML page and the ledger.

use anyhow::Context;
use goma_news::config::{ai::AiConfig, NewsConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; JSON lines with GOMA_LOG_FORMAT=json.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("goma_news=info,warn"));

    let json = std::env::var("GOMA_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Fatal before any fetch: no credential, no run.
    let ai = AiConfig::load_default().context("loading annotator credential")?;
    let cfg = NewsConfig::from_env();

    let report = goma_news::run_once(&cfg, &ai).await?;
    tracing::info!(
        entries = report.emitted.len(),
        path = %report.output_path.display(),
        "done"
    );
    Ok(())
}
