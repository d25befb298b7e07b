//! Slug -> detail page data.
//!
//! Resolution takes the first search hit for the decoded slug, then pulls the
//! similar list and credits for that movie. Any failure along the way, or an
//! empty search, ends in [`Lookup::NotFound`]; nothing partial is returned.
use anyhow::{Context, Result};
use std::fmt;
use tracing::{debug, warn};

use crate::models::{MovieDetails, MovieSummary};
use crate::tmdb::TmdbApi;

pub const MAX_SIMILAR: usize = 10;
pub const MAX_CAST: usize = 8;

#[derive(Debug)]
pub enum Lookup {
    Ready(MovieDetails),
    NotFound(NotFoundReason),
}

#[derive(Debug)]
pub enum NotFoundReason {
    /// The search for the decoded slug came back empty.
    NoMatch { query: String },
    /// Search, similar or credits failed.
    Upstream(anyhow::Error),
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::NoMatch { query } => write!(f, "no TMDB match for '{query}'"),
            NotFoundReason::Upstream(err) => write!(f, "upstream failure: {err:#}"),
        }
    }
}

impl Lookup {
    pub fn into_details(self) -> Option<MovieDetails> {
        match self {
            Lookup::Ready(details) => Some(details),
            Lookup::NotFound(_) => None,
        }
    }
}

pub async fn lookup_movie(api: &dyn TmdbApi, slug: &str) -> Lookup {
    let query = crate::slug::decode(slug);
    match aggregate(api, &query).await {
        Ok(Some(details)) => {
            debug!(
                slug = %slug,
                tmdb_id = details.movie.id,
                similar = details.similar.len(),
                cast = details.cast.len(),
                crew = details.crew.len(),
                "Movie lookup ready"
            );
            Lookup::Ready(details)
        }
        Ok(None) => {
            warn!("No TMDB match for slug '{}'", slug);
            Lookup::NotFound(NotFoundReason::NoMatch { query })
        }
        Err(err) => {
            warn!("Movie lookup for slug '{}' failed: {:#}", slug, err);
            Lookup::NotFound(NotFoundReason::Upstream(err))
        }
    }
}

async fn aggregate(api: &dyn TmdbApi, query: &str) -> Result<Option<MovieDetails>> {
    let Some(movie) = resolve(api, query).await? else {
        return Ok(None);
    };

    let (mut similar, credits) = tokio::try_join!(
        async {
            api.similar_movies(movie.id)
                .await
                .with_context(|| format!("similar movies for {}", movie.id))
        },
        async {
            api.movie_credits(movie.id)
                .await
                .with_context(|| format!("credits for {}", movie.id))
        },
    )?;

    similar.truncate(MAX_SIMILAR);
    let mut cast = credits.cast;
    cast.truncate(MAX_CAST);

    Ok(Some(MovieDetails {
        movie,
        similar,
        cast,
        crew: credits.crew,
    }))
}

// First hit wins, even when several titles share the slug.
async fn resolve(api: &dyn TmdbApi, query: &str) -> Result<Option<MovieSummary>> {
    let results = api
        .search_movies(query)
        .await
        .with_context(|| format!("search for '{query}'"))?;
    debug!(query = %query, hits = results.len(), "Resolved search");
    Ok(results.into_iter().next())
}
