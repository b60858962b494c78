use anyhow::{anyhow, Result};
use serde::Deserialize;

const CAT_API_URL: &str = "https://api.thecatapi.com/v1/images/search";

#[derive(Debug, Deserialize)]
struct CatImage {
    url: String,
}

/// Fetch one random cat image URL. The API returns a one-element array;
/// every failure mode here (network, non-2xx, bad JSON, empty array) is
/// recovered by the caller with an apology message.
pub async fn fetch_cat_url(client: &reqwest::Client, api_key: Option<&str>) -> Result<String> {
    let mut request = client.get(CAT_API_URL);
    if let Some(key) = api_key {
        request = request.header("x-api-key", key);
    }

    let images: Vec<CatImage> = request.send().await?.error_for_status()?.json().await?;

    images
        .into_iter()
        .next()
        .map(|img| img.url)
        .ok_or_else(|| anyhow!("cat api returned an empty list"))
}
