//! Data models for forum entities.
//!
//! This module contains the wire types exchanged with the forum API:
//!
//! - `Article`, `ArticlePage`, `ArticleStats`: posts and listing metadata
//! - `ArticleQuery`, `SortField`, `SortOrder`: list filters
//! - `UserProfile`: the opaque profile record held by the session
//! - `UserSummary`, `UserDetail`, `AuthPayload`: user lookups and login results

pub mod article;
pub mod user;

pub use article::{Article, ArticlePage, ArticleQuery, ArticleStats, SortField, SortOrder};
pub use user::{AuthPayload, UserDetail, UserProfile, UserSummary};
