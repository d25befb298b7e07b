use serde::{Deserialize, Deserializer, Serialize};

/// One movie as returned by the list, search and similar endpoints.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_language: String,
}

impl MovieSummary {
    pub fn slug(&self) -> String {
        crate::slug::encode(&self.title)
    }

    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CastCredit {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CrewCredit {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
}

/// Cast and crew for one movie, as returned together by the credits endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastCredit>,
    #[serde(default)]
    pub crew: Vec<CrewCredit>,
}

/// Everything the detail page renders for one movie.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MovieDetails {
    pub movie: MovieSummary,
    pub similar: Vec<MovieSummary>,
    pub cast: Vec<CastCredit>,
    pub crew: Vec<CrewCredit>,
}

impl MovieDetails {
    pub fn directors(&self) -> Vec<&str> {
        self.crew
            .iter()
            .filter(|c| c.job == "Director")
            .map(|c| c.name.as_str())
            .collect()
    }
}

// TMDB sends "" for unknown release dates.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_sparse_movie_payload() {
        let value = json!({
            "id": 603,
            "title": "The Matrix",
            "poster_path": null,
            "vote_average": 8.2,
            "release_date": "",
            "genre_ids": [28, 878],
            "overview": null
        });
        let movie: MovieSummary = serde_json::from_value(value).expect("movie deserialize");
        assert_eq!(movie.id, 603);
        assert_eq!(movie.poster_path, None);
        assert_eq!(movie.vote_count, None);
        assert_eq!(movie.release_date, None);
        assert_eq!(movie.release_year(), None);
        assert_eq!(movie.overview, "");
        assert_eq!(movie.slug(), "the-matrix");
    }

    #[test]
    fn release_year_comes_from_iso_date() {
        let movie: MovieSummary = serde_json::from_value(json!({
            "id": 1,
            "title": "Heat",
            "release_date": "1995-12-15"
        }))
        .expect("movie deserialize");
        assert_eq!(movie.release_year(), Some("1995"));
    }

    #[test]
    fn credits_split_cast_and_crew() {
        let value = json!({
            "id": 603,
            "cast": [
                { "id": 6384, "name": "Keanu Reeves", "character": "Neo", "profile_path": "/k.jpg" }
            ],
            "crew": [
                { "id": 9340, "name": "Lana Wachowski", "job": "Director", "department": "Directing" },
                { "id": 1091, "name": "Bill Pope", "job": "Director of Photography", "department": "Camera" }
            ]
        });
        let credits: Credits = serde_json::from_value(value).expect("credits deserialize");
        assert_eq!(credits.cast.len(), 1);
        assert_eq!(credits.cast[0].character, "Neo");
        assert_eq!(credits.crew.len(), 2);

        let details = MovieDetails {
            movie: serde_json::from_value(json!({ "id": 603, "title": "The Matrix" }))
                .expect("movie deserialize"),
            similar: Vec::new(),
            cast: credits.cast,
            crew: credits.crew,
        };
        assert_eq!(details.directors(), vec!["Lana Wachowski"]);
    }
}
