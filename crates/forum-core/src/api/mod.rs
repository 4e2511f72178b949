//! REST API client module for the forum server.
//!
//! This module provides the `ApiClient` wrapper (base address, fixed timeout,
//! request pipeline, envelope unwrapping) and the thin per-resource APIs
//! built on it.
//!
//! Authenticated calls carry `Authorization: Bearer <token>`; a 401 on any
//! call signs the user out.

pub mod articles;
pub mod client;
pub mod envelope;
pub mod error;
pub mod pipeline;
pub mod transport;
pub mod users;

pub use articles::ArticleApi;
pub use client::{ApiClient, RequestOptions};
pub use envelope::ErrorBody;
pub use error::ApiError;
pub use pipeline::{BearerAuth, LogoutOnUnauthorized, Pipeline, RequestHook, RequestLog, ResponseHook};
pub use transport::{OutgoingRequest, RawResponse, ReqwestTransport, Transport};
pub use users::UserApi;
