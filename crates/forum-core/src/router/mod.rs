//! Client-side routing with an authentication guard.
//!
//! This module provides:
//! - `RouteTable`/`RouteDef`: the statically declared page routes
//! - `RouteGuard`: the per-navigation title and login check
//! - `Router`: the navigator that applies the guard on every `push`

pub mod guard;
pub mod navigator;
pub mod routes;

pub use guard::{page_title, GuardOutcome, RouteGuard};
pub use navigator::{Location, Navigation, NavigationError, Router};
pub use routes::{default_routes, RouteDef, RouteMatch, RouteTable, HOME_PATH, LOGIN_PATH, REGISTER_PATH};
