// src/fetch/mod.rs
use std::future::Future;

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::config::Config;

/// One record as served by the API: an opaque field → value mapping.
/// The API defines the shape; nothing local is assumed beyond "it is a map".
pub type Record = serde_json::Map<String, Value>;

/// One paginated API response.
///
/// The JSON type of the body, not any field inside it, is the pagination
/// signal: an array is a page of records, while an object (in practice an
/// error/status message) means the category has no more data.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Page {
    Records(Vec<Record>),
    Terminal(Value),
}

/// Build the endpoint URL for one page of `category` at `offset`.
pub fn page_url(cfg: &Config, category: &str, offset: u64) -> Result<Url> {
    let raw = format!(
        "{}/SweatToilAll{}/format/json/limit/{}/offset/{}",
        cfg.base_url, category, cfg.page_size, offset
    );
    Url::parse(&raw).with_context(|| format!("building page URL {}", raw))
}

/// Fetch and decode a single page of `category` at `offset`.
pub async fn fetch_page(
    client: &Client,
    cfg: &Config,
    category: &str,
    offset: u64,
) -> Result<Page> {
    let url = page_url(cfg, category, offset)?;
    let page = client
        .get(url.clone())
        .header("X-API-KEY", &cfg.api_key)
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?
        .json::<Page>()
        .await
        .with_context(|| format!("decoding body from {}", url))?;
    Ok(page)
}

/// Drive the pagination loop over an arbitrary page source.
///
/// Offsets run 0, `page_size`, 2×`page_size`, … Record pages are appended in
/// arrival order; the first non-array response ends the loop. A source that
/// keeps returning arrays past `max_pages` is treated as a broken server and
/// fails the category rather than looping forever.
pub async fn collect_pages<F, Fut>(page_size: u64, max_pages: u64, mut next: F) -> Result<Vec<Record>>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Page>>,
{
    let mut records = Vec::new();
    for page_idx in 0..max_pages {
        let offset = page_idx * page_size;
        info!(offset, "requesting page");
        match next(offset).await? {
            Page::Records(batch) => records.extend(batch),
            Page::Terminal(_) => return Ok(records),
        }
    }
    bail!("no terminal response after {} pages", max_pages)
}

/// Fetch every record of `category`, paginating until the API signals the end.
pub async fn fetch_dataset(client: &Client, cfg: &Config, category: &str) -> Result<Vec<Record>> {
    collect_pages(cfg.page_size, cfg.max_pages, |offset| {
        fetch_page(client, cfg, category, offset)
    })
    .await
    .with_context(|| format!("fetching category {}", category))
}
