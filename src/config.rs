use std::time::Duration;

pub const BASE_URL: &str = "https://pro-api.coinmarketcap.com";
pub const LISTINGS_PATH: &str = "/v1/cryptocurrency/listings/latest";

pub const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";
pub const API_KEY_ENV: &str = "CMC_PRO_API_KEY";
pub const BASE_URL_ENV: &str = "CMC_BASE_URL";

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_START: u32 = 1;
pub const DEFAULT_FETCH_LIMIT: u32 = 500;

/// Row count shown when the user has not picked one.
pub const DEFAULT_DISPLAY_LIMIT: usize = 50;
/// Bounds of the row-count control.
pub const MIN_DISPLAY_LIMIT: usize = 1;
pub const MAX_DISPLAY_LIMIT: usize = 100;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_REDIRECTS: usize = 10;

/// Read the API key from `CMC_PRO_API_KEY`, ignoring blank values.
pub fn api_key_from_env() -> Option<String> {
    non_blank_env(API_KEY_ENV)
}

/// Read a base URL override from `CMC_BASE_URL`, ignoring blank values.
pub fn base_url_from_env() -> Option<String> {
    non_blank_env(BASE_URL_ENV)
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Full listings endpoint URL for the given base.
pub fn listings_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), LISTINGS_PATH)
}
