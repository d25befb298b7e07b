pub mod aggregate;
pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod genres;
pub mod models;
pub mod slug;
pub mod templates;
pub mod tmdb;
