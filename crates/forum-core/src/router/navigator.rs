use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, info};

use super::guard::{GuardOutcome, RouteGuard};
use super::routes::{split_path, RouteTable};

/// Upper bound on guard redirects followed by a single navigation.
const MAX_REDIRECTS: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Too many redirects while navigating to {0}")]
    RedirectLoop(String),
}

/// Where the client currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub params: BTreeMap<String, String>,
    /// Pattern of the matched route, `None` for unknown paths.
    pub pattern: Option<String>,
}

impl Location {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Result of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: String,
    pub location: Location,
    /// Paths the guard turned away, in order.
    pub redirected_from: Vec<String>,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        !self.redirected_from.is_empty()
    }
}

#[derive(Debug, Default)]
struct NavState {
    current: Option<Location>,
    title: String,
    history: Vec<String>,
}

/// In-process navigator. Every `push` runs the route guard before the
/// location changes.
pub struct Router {
    table: RouteTable,
    guard: RouteGuard,
    state: Mutex<NavState>,
}

impl Router {
    pub fn new(table: RouteTable, guard: RouteGuard) -> Self {
        Self {
            table,
            guard,
            state: Mutex::new(NavState::default()),
        }
    }

    pub fn push(&self, raw_path: &str) -> Result<Navigation, NavigationError> {
        let mut target = raw_path.to_string();
        let mut redirected_from = Vec::new();

        for _ in 0..=MAX_REDIRECTS {
            let (path, query) = split_path(&target);
            let resolved = self.table.resolve(&path);
            let route = resolved.as_ref().map(|m| m.route);

            // The title follows every navigation attempt, redirected or not.
            let title = self.guard.title_for(route);
            self.lock().title = title;

            match self.guard.evaluate(route) {
                GuardOutcome::Allowed => {
                    let location = Location {
                        path: path.clone(),
                        query,
                        params: resolved.as_ref().map(|m| m.params.clone()).unwrap_or_default(),
                        pattern: route.map(|r| r.pattern.clone()),
                    };
                    {
                        let mut state = self.lock();
                        state.current = Some(location.clone());
                        state.history.push(path);
                    }
                    debug!(path = %location.path, "Navigation complete");
                    return Ok(Navigation {
                        requested: raw_path.to_string(),
                        location,
                        redirected_from,
                    });
                }
                GuardOutcome::Redirected { to } => {
                    info!(from = %path, to = %to, "Navigation requires login, redirecting");
                    redirected_from.push(path);
                    target = to;
                }
            }
        }

        Err(NavigationError::RedirectLoop(raw_path.to_string()))
    }

    pub fn current(&self) -> Option<Location> {
        self.lock().current.clone()
    }

    pub fn current_path(&self) -> Option<String> {
        self.lock().current.as_ref().map(|l| l.path.clone())
    }

    /// Display title set by the most recent navigation.
    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    fn lock(&self) -> MutexGuard<'_, NavState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionContext;
    use crate::models::UserProfile;
    use crate::router::routes::{default_routes, RouteDef};
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn router_with(routes: Vec<RouteDef>) -> (Arc<SessionContext>, Router) {
        let session = Arc::new(SessionContext::restore(Arc::new(MemoryStorage::new())));
        let guard = RouteGuard::new(session.clone(), "Network Demo");
        (session, Router::new(RouteTable::new(routes), guard))
    }

    fn router() -> (Arc<SessionContext>, Router) {
        router_with(default_routes())
    }

    #[test]
    fn test_guarded_routes_redirect_to_login_when_signed_out() {
        let (_, router) = router();
        for path in ["/article/create", "/article/edit/5"] {
            let nav = router.push(path).unwrap();
            assert_eq!(nav.location.path, "/login");
            assert_eq!(nav.redirected_from, vec![path.to_string()]);
            assert_eq!(router.current_path().as_deref(), Some("/login"));
            assert_eq!(router.title(), "Login - Network Demo");
        }
        assert_eq!(router.history(), vec!["/login", "/login"]);
    }

    #[test]
    fn test_guarded_route_allowed_when_signed_in() {
        let (session, router) = router();
        session.apply("jwt", UserProfile::default());

        let nav = router.push("/article/edit/5").unwrap();
        assert!(!nav.was_redirected());
        assert_eq!(nav.location.pattern.as_deref(), Some("/article/edit/:id"));
        assert_eq!(nav.location.param("id"), Some("5"));
        assert_eq!(router.title(), "Edit Article - Network Demo");
    }

    #[test]
    fn test_title_set_for_every_route() {
        let (_, router) = router();
        let cases = [
            ("/", "Home - Network Demo"),
            ("/login", "Login - Network Demo"),
            ("/register", "Register - Network Demo"),
            ("/article/9", "Article - Network Demo"),
        ];
        for (path, title) in cases {
            router.push(path).unwrap();
            assert_eq!(router.title(), title);
        }
    }

    #[test]
    fn test_unknown_path_uses_default_title() {
        let (_, router) = router();
        let nav = router.push("/does/not/exist?x=1").unwrap();
        assert_eq!(nav.location.path, "/does/not/exist");
        assert_eq!(nav.location.pattern, None);
        assert_eq!(nav.location.query, vec![("x".to_string(), "1".to_string())]);
        assert_eq!(router.title(), "Network Demo");
    }

    #[test]
    fn test_redirect_loop_is_bounded() {
        let (_, router) = router_with(vec![RouteDef::new("/login").title("Login").requires_auth()]);
        assert_eq!(
            router.push("/login"),
            Err(NavigationError::RedirectLoop("/login".to_string()))
        );
        assert_eq!(router.current(), None);
    }
}
