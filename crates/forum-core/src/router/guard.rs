use std::sync::Arc;

use crate::auth::SessionContext;

use super::routes::{RouteDef, LOGIN_PATH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allowed,
    Redirected { to: String },
}

/// Per-navigation check: picks the display title and keeps signed-out users
/// away from routes that require a session.
pub struct RouteGuard {
    session: Arc<SessionContext>,
    app_title: String,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionContext>, app_title: impl Into<String>) -> Self {
        Self {
            session,
            app_title: app_title.into(),
        }
    }

    pub fn evaluate(&self, route: Option<&RouteDef>) -> GuardOutcome {
        let requires_auth = route.map_or(false, |r| r.requires_auth);
        if requires_auth && !self.session.is_authenticated() {
            GuardOutcome::Redirected {
                to: LOGIN_PATH.to_string(),
            }
        } else {
            GuardOutcome::Allowed
        }
    }

    pub fn title_for(&self, route: Option<&RouteDef>) -> String {
        page_title(route.and_then(|r| r.title.as_deref()), &self.app_title)
    }
}

/// `"<title> - <app>"` for titled routes, otherwise just the app title.
pub fn page_title(title: Option<&str>, app_title: &str) -> String {
    match title {
        Some(title) if !title.is_empty() => format!("{} - {}", title, app_title),
        _ => app_title.to_string(),
    }
}
