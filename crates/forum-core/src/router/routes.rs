use std::collections::BTreeMap;

use reqwest::Url;
use tracing::warn;

/// Destination of a successful login or registration.
pub const HOME_PATH: &str = "/";

/// Destination of logout and of every guard redirect.
pub const LOGIN_PATH: &str = "/login";

pub const REGISTER_PATH: &str = "/register";

/// A statically declared navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    pub pattern: String,
    pub title: Option<String>,
    pub requires_auth: bool,
}

impl RouteDef {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            title: None,
            requires_auth: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Match a path (without query string) against this pattern.
    ///
    /// Returns the number of static segments matched, used to rank
    /// candidates, together with the captured `:param` values.
    fn match_path(&self, path: &str) -> Option<(usize, BTreeMap<String, String>)> {
        let pattern: Vec<&str> = segments(&self.pattern).collect();
        let actual: Vec<&str> = segments(path).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        let mut static_segments = 0;
        for (expected, got) in pattern.iter().zip(actual.iter()) {
            if let Some(name) = expected.strip_prefix(':') {
                params.insert(name.to_string(), (*got).to_string());
            } else if expected == got {
                static_segments += 1;
            } else {
                return None;
            }
        }
        Some((static_segments, params))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A route resolved for a concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDef,
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDef>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    /// Find the best route for `path`. Static segments beat parameters, so
    /// `/article/create` wins over `/article/:id`; ties go to the route
    /// declared first.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let mut best: Option<(usize, RouteMatch<'_>)> = None;
        for route in &self.routes {
            if let Some((score, params)) = route.match_path(path) {
                let better = best.as_ref().map_or(true, |(s, _)| score > *s);
                if better {
                    best = Some((score, RouteMatch { route, params }));
                }
            }
        }
        best.map(|(_, m)| m)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(default_routes())
    }
}

/// The forum's page routes.
pub fn default_routes() -> Vec<RouteDef> {
    vec![
        RouteDef::new(HOME_PATH).title("Home"),
        RouteDef::new(LOGIN_PATH).title("Login"),
        RouteDef::new(REGISTER_PATH).title("Register"),
        RouteDef::new("/article/:id").title("Article"),
        RouteDef::new("/article/create")
            .title("New Article")
            .requires_auth(),
        RouteDef::new("/article/edit/:id")
            .title("Edit Article")
            .requires_auth(),
    ]
}

/// Base the query string is parsed against; only the query part is read.
const QUERY_BASE: &str = "http://router.local/";

/// Split `"/path?a=1&b=2#frag"` into a normalized path and its decoded query
/// pairs.
pub fn split_path(raw: &str) -> (String, Vec<(String, String)>) {
    let without_fragment = raw.split('#').next().unwrap_or_default();
    let (path, query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (without_fragment, ""),
    };

    let joined: Vec<&str> = segments(path).collect();
    let normalized = format!("/{}", joined.join("/"));

    (normalized, query_pairs(query))
}

fn query_pairs(query: &str) -> Vec<(String, String)> {
    if query.is_empty() {
        return Vec::new();
    }
    let mut url = match Url::parse(QUERY_BASE) {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "Failed to parse query base");
            return Vec::new();
        }
    };
    url.set_query(Some(query));
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
