//! Genre name -> TMDB genre id table used to split the list page into rows.
use once_cell::sync::Lazy;

#[derive(Debug, Clone, PartialEq)]
pub struct GenreTable {
    entries: Vec<(String, i64)>,
}

impl GenreTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, id)| (name.into(), id))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn id_of(&self, name: &str) -> Option<i64> {
        self.iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, id)| id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for GenreTable {
    fn default() -> Self {
        DEFAULT_GENRES.clone()
    }
}

// Ids from TMDB's /genre/movie/list; order is display order.
static DEFAULT_GENRES: Lazy<GenreTable> = Lazy::new(|| {
    GenreTable::new([
        ("Action", 28),
        ("Adventure", 12),
        ("Animation", 16),
        ("Comedy", 35),
        ("Crime", 80),
        ("Drama", 18),
        ("Family", 10751),
        ("Fantasy", 14),
        ("Horror", 27),
        ("Science Fiction", 878),
        ("Thriller", 53),
    ])
});
