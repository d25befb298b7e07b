use crate::aggregate::{lookup_movie, Lookup};
use crate::catalog::{self, SortKey};
use crate::config::Config;
use crate::error::AppResult;
use crate::genres::GenreTable;
use crate::templates::{self, ListView};
use crate::tmdb::{TmdbApi, TmdbClient};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
    pub genres: Arc<GenreTable>,
    pub popular_limit: usize,
    pub image_base: String,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::from_config(config)?);
        Ok(Self {
            tmdb,
            genres: Arc::new(GenreTable::default()),
            popular_limit: config.popular_limit,
            image_base: config.image_base.clone(),
        })
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    info!(
        "Serving {} popular titles per page from {}",
        state.popular_limit, config.tmdb_base_url
    );

    let app = build_router(state).layer(TraceLayer::new_for_http());

    info!("Listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_movies))
        .route("/movies/:slug", get(movie_detail))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    sort: Option<String>,
}

async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> AppResult<Html<String>> {
    let popular = catalog::fetch_popular(state.tmdb.as_ref(), state.popular_limit).await?;

    let sort = params.sort.as_deref().and_then(SortKey::from_param);
    let filtered = catalog::filter_by_title(&popular, &params.q);
    let movies = catalog::sort_by(&filtered, sort);
    let rows = catalog::group_by_genre(&movies, &state.genres);

    Ok(Html(templates::list_page(&ListView {
        query: params.q.trim(),
        sort,
        movies: &movies,
        rows: &rows,
        image_base: &state.image_base,
    })))
}

async fn movie_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match lookup_movie(state.tmdb.as_ref(), &slug).await {
        Lookup::Ready(details) => {
            info!("Rendering '{}' for slug '{}'", details.movie.title, slug);
            Html(templates::movie_page(&details, &state.image_base)).into_response()
        }
        Lookup::NotFound(reason) => {
            info!("Not found for slug '{}': {}", slug, reason);
            (StatusCode::NOT_FOUND, Html(templates::not_found_page())).into_response()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
