//! Popular-list fetching plus the in-memory filter, sort and genre bucketing
//! applied to it on the list page.
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::genres::GenreTable;
use crate::models::MovieSummary;
use crate::tmdb::TmdbApi;

/// Fetches the popular list and keeps the first `limit` entries in upstream order.
pub async fn fetch_popular(api: &dyn TmdbApi, limit: usize) -> Result<Vec<MovieSummary>> {
    let mut movies = api
        .popular_movies()
        .await
        .context("Failed to fetch popular movies")?;
    movies.truncate(limit);
    debug!(count = movies.len(), limit, "Popular slice ready");
    Ok(movies)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    RatingDesc,
    RatingAsc,
    ReleaseDesc,
    ReleaseAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::RatingDesc,
        SortKey::RatingAsc,
        SortKey::ReleaseDesc,
        SortKey::ReleaseAsc,
    ];

    /// Unknown values yield `None`, which sorts as "keep upstream order".
    pub fn from_param(raw: &str) -> Option<Self> {
        match raw.trim() {
            "rating-desc" => Some(SortKey::RatingDesc),
            "rating-asc" => Some(SortKey::RatingAsc),
            "release-desc" => Some(SortKey::ReleaseDesc),
            "release-asc" => Some(SortKey::ReleaseAsc),
            _ => None,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            SortKey::RatingDesc => "rating-desc",
            SortKey::RatingAsc => "rating-asc",
            SortKey::ReleaseDesc => "release-desc",
            SortKey::ReleaseAsc => "release-asc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::RatingDesc => "Rating: high to low",
            SortKey::RatingAsc => "Rating: low to high",
            SortKey::ReleaseDesc => "Newest first",
            SortKey::ReleaseAsc => "Oldest first",
        }
    }
}

pub fn filter_by_title(movies: &[MovieSummary], query: &str) -> Vec<MovieSummary> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return movies.to_vec();
    }
    movies
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Returns a sorted copy; `None` keeps the input order.
pub fn sort_by(movies: &[MovieSummary], key: Option<SortKey>) -> Vec<MovieSummary> {
    let mut out = movies.to_vec();
    let Some(key) = key else {
        return out;
    };
    match key {
        SortKey::RatingDesc => out.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average)),
        SortKey::RatingAsc => out.sort_by(|a, b| a.vote_average.total_cmp(&b.vote_average)),
        SortKey::ReleaseDesc => out.sort_by(|a, b| cmp_release(a, b, true)),
        SortKey::ReleaseAsc => out.sort_by(|a, b| cmp_release(a, b, false)),
    }
    out
}

// Undated movies go last regardless of direction.
fn cmp_release(a: &MovieSummary, b: &MovieSummary, newest_first: bool) -> Ordering {
    match (release_date(a), release_date(b)) {
        (Some(x), Some(y)) if newest_first => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn release_date(movie: &MovieSummary) -> Option<NaiveDate> {
    movie
        .release_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreRow {
    pub name: String,
    pub movies: Vec<MovieSummary>,
}

/// One row per table entry that matches at least one movie, in table order.
pub fn group_by_genre(movies: &[MovieSummary], table: &GenreTable) -> Vec<GenreRow> {
    table
        .iter()
        .filter_map(|(name, id)| {
            let matching: Vec<MovieSummary> = movies
                .iter()
                .filter(|m| m.genre_ids.contains(&id))
                .cloned()
                .collect();
            (!matching.is_empty()).then(|| GenreRow {
                name: name.to_string(),
                movies: matching,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn movie(id: i64, title: &str, rating: f64, date: Option<&str>, genres: &[i64]) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            poster_path: None,
            vote_average: rating,
            vote_count: None,
            release_date: date.map(str::to_string),
            genre_ids: genres.to_vec(),
            backdrop_path: None,
            overview: String::new(),
            original_language: "en".to_string(),
        }
    }

    fn ratings(movies: &[MovieSummary]) -> Vec<f64> {
        movies.iter().map(|m| m.vote_average).collect()
    }

    fn ids(movies: &[MovieSummary]) -> Vec<i64> {
        movies.iter().map(|m| m.id).collect()
    }

    struct PopularOnly(Vec<MovieSummary>);

    #[async_trait]
    impl TmdbApi for PopularOnly {
        async fn popular_movies(&self) -> Result<Vec<MovieSummary>> {
            Ok(self.0.clone())
        }
        async fn search_movies(&self, _query: &str) -> Result<Vec<MovieSummary>> {
            unreachable!("search is not used by the catalog")
        }
        async fn similar_movies(&self, _id: i64) -> Result<Vec<MovieSummary>> {
            unreachable!("similar is not used by the catalog")
        }
        async fn movie_credits(&self, _id: i64) -> Result<crate::models::Credits> {
            unreachable!("credits are not used by the catalog")
        }
    }

    struct PopularDown;

    #[async_trait]
    impl TmdbApi for PopularDown {
        async fn popular_movies(&self) -> Result<Vec<MovieSummary>> {
            Err(anyhow::anyhow!("connection refused"))
        }
        async fn search_movies(&self, _query: &str) -> Result<Vec<MovieSummary>> {
            unreachable!()
        }
        async fn similar_movies(&self, _id: i64) -> Result<Vec<MovieSummary>> {
            unreachable!()
        }
        async fn movie_credits(&self, _id: i64) -> Result<crate::models::Credits> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn fetch_popular_keeps_first_entries_in_order() {
        let upstream: Vec<MovieSummary> = (1..=30)
            .map(|i| movie(i, &format!("Movie {i}"), 5.0, None, &[]))
            .collect();
        let api = PopularOnly(upstream);
        let movies = fetch_popular(&api, 12).await.expect("popular");
        assert_eq!(ids(&movies), (1..=12).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn fetch_popular_with_short_payload_returns_everything() {
        let api = PopularOnly(vec![movie(1, "Only", 5.0, None, &[])]);
        let movies = fetch_popular(&api, 30).await.expect("popular");
        assert_eq!(ids(&movies), vec![1]);
    }

    #[tokio::test]
    async fn fetch_popular_propagates_upstream_failure() {
        let err = fetch_popular(&PopularDown, 12).await.unwrap_err();
        assert!(format!("{err:#}").contains("connection refused"));
    }

    #[test]
    fn empty_query_is_identity() {
        let movies = vec![
            movie(1, "Dune", 8.0, None, &[]),
            movie(2, "Arrival", 7.9, None, &[]),
        ];
        assert_eq!(filter_by_title(&movies, ""), movies);
        assert_eq!(filter_by_title(&movies, "   "), movies);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let movies = vec![
            movie(1, "Dune: Part Two", 8.0, None, &[]),
            movie(2, "Arrival", 7.9, None, &[]),
            movie(3, "DUNE", 6.5, None, &[]),
        ];
        assert_eq!(ids(&filter_by_title(&movies, "dUnE")), vec![1, 3]);
        assert!(filter_by_title(&movies, "zzz").is_empty());
    }

    #[test]
    fn sorts_by_rating_descending() {
        let movies = vec![
            movie(1, "A", 5.0, None, &[]),
            movie(2, "B", 8.0, None, &[]),
            movie(3, "C", 2.0, None, &[]),
        ];
        let sorted = sort_by(&movies, SortKey::from_param("rating-desc"));
        assert_eq!(ratings(&sorted), vec![8.0, 5.0, 2.0]);
        let sorted = sort_by(&movies, SortKey::from_param("rating-asc"));
        assert_eq!(ratings(&sorted), vec![2.0, 5.0, 8.0]);
        // input untouched
        assert_eq!(ratings(&movies), vec![5.0, 8.0, 2.0]);
    }

    #[test]
    fn unknown_sort_key_keeps_input_order() {
        let movies = vec![
            movie(1, "A", 5.0, None, &[]),
            movie(2, "B", 8.0, None, &[]),
            movie(3, "C", 2.0, None, &[]),
        ];
        assert_eq!(SortKey::from_param("popularity"), None);
        assert_eq!(ratings(&sort_by(&movies, SortKey::from_param("popularity"))), vec![5.0, 8.0, 2.0]);
        assert_eq!(ratings(&sort_by(&movies, None)), vec![5.0, 8.0, 2.0]);
    }

    #[test]
    fn sorts_by_release_date_with_undated_last() {
        let movies = vec![
            movie(1, "Mid", 5.0, Some("2010-06-01"), &[]),
            movie(2, "Undated", 5.0, None, &[]),
            movie(3, "New", 5.0, Some("2024-03-01"), &[]),
            movie(4, "Old", 5.0, Some("1999-03-31"), &[]),
            movie(5, "Garbage", 5.0, Some("soon"), &[]),
        ];
        let newest = sort_by(&movies, Some(SortKey::ReleaseDesc));
        assert_eq!(&ids(&newest)[..3], &[3, 1, 4]);
        let oldest = sort_by(&movies, Some(SortKey::ReleaseAsc));
        assert_eq!(&ids(&oldest)[..3], &[4, 1, 3]);
        for sorted in [newest, oldest] {
            let mut tail = ids(&sorted)[3..].to_vec();
            tail.sort();
            assert_eq!(tail, vec![2, 5]);
        }
    }

    #[test]
    fn sort_keys_round_trip_through_params() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::from_param(key.as_param()), Some(key));
        }
    }

    #[test]
    fn movie_appears_under_every_matching_genre() {
        let table = GenreTable::new([("Action", 28), ("Animation", 16), ("Horror", 27)]);
        let movies = vec![
            movie(1, "Spider-Verse", 8.4, None, &[28, 16]),
            movie(2, "Heat", 8.3, None, &[28, 80]),
        ];
        let rows = group_by_genre(&movies, &table);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Action", "Animation"]);
        assert_eq!(ids(&rows[0].movies), vec![1, 2]);
        assert_eq!(ids(&rows[1].movies), vec![1]);
    }

    #[test]
    fn genres_without_movies_are_omitted() {
        let table = GenreTable::new([("Horror", 27)]);
        let movies = vec![movie(1, "Paddington", 7.0, None, &[10751, 35])];
        assert!(group_by_genre(&movies, &table).is_empty());
        assert!(group_by_genre(&[], &GenreTable::default()).is_empty());
    }
}
