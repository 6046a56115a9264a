// src/config.rs
use std::time::Duration;

use url::Url;

/// The eight Sweat & Toil dataset categories served by the DOL API.
/// Each one is both the API resource suffix and the output file stem.
pub static CATEGORIES: &[&str] = &[
    "Assessments",
    "Conventions",
    "Countries",
    "CountryGoods",
    "Enforcements",
    "LegalStandards",
    "Mechanisms",
    "Statistics",
];

const BASE_URL: &str = "https://data.dol.gov/get";
const API_KEY: &str = "ef23e86d-0a3d-4769-b7dc-c2214e1987cf";

/// Run configuration, built once in `main` and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the DOL `get` API, without a trailing slash.
    pub base_url: Url,
    /// Static credential sent as the `X-API-KEY` header.
    pub api_key: String,
    /// Records per page; the API paginates every 200 results.
    pub page_size: u64,
    /// Categories to fetch, in processing order.
    pub categories: Vec<String>,
    /// Per-request timeout; the API has no streaming responses.
    pub request_timeout: Duration,
    /// Cap on pages per category, so a server that never sends the
    /// terminal object fails the run instead of looping forever.
    pub max_pages: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(BASE_URL).expect("base URL should parse"),
            api_key: API_KEY.to_string(),
            page_size: 200,
            categories: CATEGORIES.iter().map(|c| c.to_string()).collect(),
            request_timeout: Duration::from_secs(30),
            max_pages: 10_000,
        }
    }
}
