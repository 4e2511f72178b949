//! Core library for the Network Demo forum client.
//!
//! Holds the session store, the route guard, the HTTP client wrapper and the
//! per-resource APIs. Front ends build an [`App`] once and drive it.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod models;
pub mod router;
pub mod storage;

pub use api::{ApiClient, ApiError, ArticleApi, UserApi};
pub use app::App;
pub use auth::{SessionContext, UserStore};
pub use config::Config;
pub use router::{Navigation, Router};
