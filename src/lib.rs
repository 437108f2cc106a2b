pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod document;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod search;
pub mod services;

pub use app::{app, AppState};
