use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde_json::{json, Value};

use crate::catalog::{GenreRow, SortKey};
use crate::models::{CastCredit, MovieDetails, MovieSummary};
use crate::tmdb::image_url;

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const POSTER_SIZE: &str = "w342";
const BACKDROP_SIZE: &str = "w1280";
const PROFILE_SIZE: &str = "w185";
// Used when the upstream payload carries no vote count.
const FALLBACK_RATING_COUNT: u32 = 1000;

/// What the list page shows after filtering and sorting.
pub struct ListView<'a> {
    pub query: &'a str,
    pub sort: Option<SortKey>,
    pub movies: &'a [MovieSummary],
    pub rows: &'a [GenreRow],
    pub image_base: &'a str,
}

pub fn list_page(view: &ListView<'_>) -> String {
    page(
        "Popular Movies",
        html! {},
        html! {
            main class="p-6 max-w-6xl mx-auto" {
                h1 class="text-3xl font-bold mb-6" { "Popular Movies" }
                (search_bar(view.query, view.sort))

                @if view.movies.is_empty() {
                    p class="mt-8 text-gray-600" { "No movies match \"" (view.query) "\"." }
                } @else {
                    div class="mt-6 grid grid-cols-1 sm:grid-cols-2 md:grid-cols-3 gap-6" {
                        @for movie in view.movies {
                            (movie_card(movie, view.image_base))
                        }
                    }
                }

                @for row in view.rows {
                    section class="mt-12" {
                        h2 class="text-2xl font-semibold mb-4" { (row.name) }
                        div class="flex gap-4 overflow-x-auto pb-2" {
                            @for movie in &row.movies {
                                (poster_link(movie, view.image_base))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn movie_page(details: &MovieDetails, image_base: &str) -> String {
    let movie = &details.movie;
    let directors = details.directors();
    let title = format!("{} | Movie Details", movie.title);
    let head = html! {
        meta name="description" content=(movie.overview);
        meta property="og:title" content=(movie.title);
        meta property="og:description" content=(movie.overview);
        meta property="og:type" content="movie";
        script type="application/ld+json" { (PreEscaped(json_ld_script(movie))) }
    };

    page(
        &title,
        head,
        html! {
            @if let Some(path) = &movie.backdrop_path {
                div class="h-64 bg-cover bg-center" style=(format!("background-image: url('{}')", image_url(image_base, BACKDROP_SIZE, path))) {}
            }
            main class="p-6 max-w-5xl mx-auto" {
                a class="text-sm text-blue-600 hover:text-blue-800" href="/" { "← All movies" }
                div class="mt-4 flex flex-col md:flex-row gap-8" {
                    (poster(movie, image_base, "w-64 rounded shadow"))
                    div {
                        h1 class="text-3xl font-bold mb-4" { (movie.title) }
                        p class="text-gray-600 mb-2" {
                            "⭐ Rating: " (format_rating(movie.vote_average))
                            @if let Some(count) = movie.vote_count {
                                span class="text-gray-400" { " (" (count) " votes)" }
                            }
                        }
                        @if let Some(date) = &movie.release_date {
                            p class="text-gray-600 mb-2" { "Released " (date) }
                        }
                        @if !directors.is_empty() {
                            p class="text-gray-600 mb-4" { "Directed by " (directors.join(", ")) }
                        }
                        p class="text-gray-700" { (movie.overview) }
                    }
                }

                @if !details.cast.is_empty() {
                    section class="mt-10" {
                        h2 class="text-2xl font-semibold mb-4" { "Cast" }
                        div class="grid grid-cols-2 sm:grid-cols-4 gap-4" {
                            @for member in &details.cast {
                                (cast_card(member, image_base))
                            }
                        }
                    }
                }

                @if !details.similar.is_empty() {
                    section class="mt-10" {
                        h2 class="text-2xl font-semibold mb-4" { "Similar titles" }
                        div class="flex gap-4 overflow-x-auto pb-2" {
                            @for other in &details.similar {
                                (poster_link(other, image_base))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn not_found_page() -> String {
    message_page(
        "Movie not found",
        "We couldn't find that movie. It may have been renamed or removed.",
    )
}

pub fn error_page() -> String {
    message_page(
        "Something went wrong",
        "The movie catalog is unavailable right now. Please try again later.",
    )
}

/// schema.org `Movie` record embedded in the detail page.
pub fn movie_json_ld(movie: &MovieSummary) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Movie",
        "name": movie.title,
        "description": movie.overview,
        "datePublished": movie.release_date,
        "aggregateRating": {
            "@type": "AggregateRating",
            "ratingValue": movie.vote_average,
            "ratingCount": movie.vote_count.unwrap_or(FALLBACK_RATING_COUNT),
        },
    })
}

// `<` is escaped so overview text cannot terminate the script element.
fn json_ld_script(movie: &MovieSummary) -> String {
    movie_json_ld(movie).to_string().replace('<', "\\u003c")
}

fn page(title: &str, head: Markup, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                (head)
                script src=(TAILWIND_CDN) {}
            }
            body class="bg-gray-50" { (body) }
        }
    }
    .into_string()
}

fn message_page(heading: &str, message: &str) -> String {
    page(
        heading,
        html! {},
        html! {
            main class="min-h-screen flex items-center justify-center px-6" {
                div class="max-w-xl w-full bg-white shadow rounded-lg p-8" {
                    h1 class="text-2xl font-bold text-gray-900" { (heading) }
                    p class="mt-4 text-gray-700" { (message) }
                    a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back to popular movies" }
                }
            }
        },
    )
}

fn search_bar(query: &str, sort: Option<SortKey>) -> Markup {
    html! {
        form class="flex flex-wrap items-center gap-3" method="get" action="/" {
            input class="flex-1 min-w-[12rem] rounded-md border border-gray-300 px-3 py-2" type="search" name="q" value=(query) placeholder="Filter by title";
            @if let Some(key) = sort {
                input type="hidden" name="sort" value=(key.as_param());
            }
            button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Search" }
        }
        nav class="mt-3 flex flex-wrap gap-2 text-sm" {
            @for key in SortKey::ALL {
                @let active = sort == Some(key);
                a class=(if active { "rounded-full px-3 py-1 bg-blue-600 text-white" } else { "rounded-full px-3 py-1 bg-white border text-gray-700 hover:border-blue-500" })
                    href=(sort_href(query, key)) { (key.label()) }
            }
        }
    }
}

fn sort_href(query: &str, key: SortKey) -> String {
    if query.trim().is_empty() {
        format!("/?sort={}", key.as_param())
    } else {
        format!(
            "/?q={}&sort={}",
            urlencoding::encode(query.trim()),
            key.as_param()
        )
    }
}

fn movie_href(movie: &MovieSummary) -> String {
    format!("/movies/{}", movie.slug())
}

fn movie_card(movie: &MovieSummary, image_base: &str) -> Markup {
    html! {
        a href=(movie_href(movie)) {
            div class="flex gap-4 border bg-white p-4 rounded shadow cursor-pointer hover:border-blue-500 transition" {
                (poster(movie, image_base, "w-20 rounded"))
                div {
                    h2 class="font-semibold text-lg" { (movie.title) }
                    p class="text-sm text-gray-600" {
                        "⭐ " (format_rating(movie.vote_average))
                        @if let Some(year) = movie.release_year() {
                            " · " (year)
                        }
                    }
                }
            }
        }
    }
}

fn poster_link(movie: &MovieSummary, image_base: &str) -> Markup {
    html! {
        a class="w-32 shrink-0" href=(movie_href(movie)) title=(movie.title) {
            (poster(movie, image_base, "w-32 rounded shadow hover:opacity-80"))
            p class="mt-1 text-sm truncate" { (movie.title) }
        }
    }
}

fn poster(movie: &MovieSummary, image_base: &str, class: &str) -> Markup {
    html! {
        @if let Some(path) = &movie.poster_path {
            img class=(class) src=(image_url(image_base, POSTER_SIZE, path)) alt=(format!("{} poster", movie.title)) loading="lazy";
        } @else {
            div class=(format!("{class} aspect-[2/3] bg-gray-200")) {}
        }
    }
}

fn cast_card(member: &CastCredit, image_base: &str) -> Markup {
    html! {
        div class="bg-white rounded shadow p-2" {
            @if let Some(path) = &member.profile_path {
                img class="w-full rounded" src=(image_url(image_base, PROFILE_SIZE, path)) alt=(member.name) loading="lazy";
            } @else {
                div class="w-full aspect-[2/3] rounded bg-gray-200" {}
            }
            p class="mt-2 font-medium" { (member.name) }
            @if !member.character.is_empty() {
                p class="text-sm text-gray-500" { (member.character) }
            }
        }
    }
}

fn format_rating(vote_average: f64) -> String {
    format!("{vote_average:.1}")
}
