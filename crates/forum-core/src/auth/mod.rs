//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionContext`: the credential and user profile, mirrored to storage
//! - `UserStore`: login, registration and logout flows
//!
//! There is no client-side expiry; a session ends on logout or when the
//! server answers 401.

pub mod session;
pub mod store;

pub use session::{SessionContext, SessionState};
pub use store::{sign_out, UserStore};
