use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::tmdb::{IMAGE_BASE, TMDB_BASE};

pub const DEFAULT_POPULAR_LIMIT: usize = 12;

/// Process configuration, read once at startup and passed down explicitly.
#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub tmdb_bearer_token: String,
    pub tmdb_base_url: String,
    pub image_base: String,
    pub tmdb_timeout: Duration,
    pub popular_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let tmdb_bearer_token = env::var("TMDB_BEARER_TOKEN")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("TMDB_BEARER_TOKEN must be set"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = parse_var("PORT", 3000)?;
        let addr = format!("{host}:{port}")
            .parse()
            .context("HOST/PORT do not form a socket address")?;

        Ok(Self {
            addr,
            tmdb_bearer_token,
            tmdb_base_url: env::var("TMDB_BASE_URL").unwrap_or_else(|_| TMDB_BASE.to_string()),
            image_base: env::var("TMDB_IMAGE_BASE").unwrap_or_else(|_| IMAGE_BASE.to_string()),
            tmdb_timeout: Duration::from_secs(parse_var("TMDB_TIMEOUT_SECS", 15)?),
            popular_limit: parse_var("POPULAR_LIMIT", DEFAULT_POPULAR_LIMIT)?,
        })
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        _ => Ok(default),
    }
}
