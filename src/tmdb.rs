use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::models::{Credits, MovieSummary};

pub const TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Read-only view of the TMDB endpoints the site depends on.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn popular_movies(&self) -> Result<Vec<MovieSummary>>;
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>>;
    async fn similar_movies(&self, id: i64) -> Result<Vec<MovieSummary>>;
    async fn movie_credits(&self, id: i64) -> Result<Credits>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    bearer_token: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Page {
    results: Vec<MovieSummary>,
}

impl TmdbClient {
    pub fn new(bearer_token: String, base_url: String, timeout: Duration) -> Result<Self> {
        let user_agent = format!("cinedex/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            bearer_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.tmdb_bearer_token.clone(),
            config.tmdb_base_url.clone(),
            config.tmdb_timeout,
        )
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let res = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("language", "en-US")])
            .query(query)
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {}: {}", path, status, text));
        }
        let parsed: T = serde_json::from_str(&text)
            .with_context(|| format!("JSON parse failed for {path}"))?;
        Ok(parsed)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn popular_movies(&self) -> Result<Vec<MovieSummary>> {
        let page: Page = self.get_json("/movie/popular", &[]).await?;
        debug!(count = page.results.len(), "Fetched popular movies");
        Ok(page.results)
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>> {
        let page: Page = self.get_json("/search/movie", &[("query", query)]).await?;
        debug!(query = %query, count = page.results.len(), "Searched movies");
        Ok(page.results)
    }

    async fn similar_movies(&self, id: i64) -> Result<Vec<MovieSummary>> {
        let page: Page = self
            .get_json(&format!("/movie/{id}/similar"), &[])
            .await?;
        debug!(tmdb_id = id, count = page.results.len(), "Fetched similar movies");
        Ok(page.results)
    }

    async fn movie_credits(&self, id: i64) -> Result<Credits> {
        let credits: Credits = self
            .get_json(&format!("/movie/{id}/credits"), &[])
            .await?;
        debug!(
            tmdb_id = id,
            cast = credits.cast.len(),
            crew = credits.crew.len(),
            "Fetched credits"
        );
        Ok(credits)
    }
}

/// Builds a CDN URL such as `https://image.tmdb.org/t/p/w342/abc.jpg`.
pub fn image_url(image_base: &str, size: &str, path: &str) -> String {
    format!("{}/{}{}", image_base.trim_end_matches('/'), size, path)
}
