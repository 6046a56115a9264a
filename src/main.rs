use anyhow::{Context, Result};
use dolscraper::{config::Config, fetch, table};
use reqwest::Client;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) config + shared client ───────────────────────────────────
    let cfg = Config::default();
    let client = Client::builder()
        .timeout(cfg.request_timeout)
        .build()
        .context("building HTTP client")?;
    info!(categories = cfg.categories.len(), "fetching Sweat & Toil datasets");

    // ─── 3) fetch + write each category, strictly in order ───────────
    // Pages within a category are sequential (each offset depends on the
    // prior page completing), and a failure aborts the remaining
    // categories; CSVs already written stay on disk.
    for category in &cfg.categories {
        info!(category = %category, "processing category");
        let start = Instant::now();

        let records = fetch::fetch_dataset(&client, &cfg, category).await?;

        let out_path = format!("{}.csv", category);
        let rows = table::write_csv(&records, &out_path)
            .with_context(|| format!("writing {}", out_path))?;

        info!(
            category = %category,
            rows,
            elapsed = ?start.elapsed(),
            "wrote {}",
            out_path
        );
    }

    info!("all done");
    Ok(())
}
