//! Query TMDB the same way the site does and print the result as JSON.
//! Usage:
//!   cargo run --bin catalog_probe -- popular [limit]
//!   cargo run --bin catalog_probe -- movie <slug>
//! Requires TMDB_BEARER_TOKEN in the environment (.env supported).

use anyhow::{Context, Result};
use cinedex::aggregate::{lookup_movie, Lookup};
use cinedex::catalog::fetch_popular;
use cinedex::config::Config;
use cinedex::tmdb::TmdbClient;
use dotenvy::dotenv;
use serde_json::json;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::from_env()?;
    let client = TmdbClient::from_config(&config)?;

    match args.first().map(String::as_str) {
        Some("popular") => {
            let limit = match args.get(1) {
                Some(raw) => raw.parse().context("limit must be a number")?,
                None => config.popular_limit,
            };
            let movies = fetch_popular(&client, limit).await?;
            let listing: Vec<_> = movies
                .iter()
                .map(|m| {
                    json!({
                        "id": m.id,
                        "title": m.title,
                        "slug": m.slug(),
                        "vote_average": m.vote_average,
                        "release_date": m.release_date,
                        "genre_ids": m.genre_ids,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Some("movie") => {
            let slug = args
                .get(1)
                .context("usage: catalog_probe movie <slug>")?;
            match lookup_movie(&client, slug).await {
                Lookup::Ready(details) => {
                    println!("{}", serde_json::to_string_pretty(&details)?);
                }
                Lookup::NotFound(reason) => {
                    println!("{}", json!({ "not_found": reason.to_string() }));
                }
            }
        }
        _ => anyhow::bail!("usage: catalog_probe popular [limit] | catalog_probe movie <slug>"),
    }

    Ok(())
}
