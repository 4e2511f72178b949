//! Application context for the forum client.
//!
//! `App` is built once at startup and owns the shared handles: storage,
//! session, router, API client and the per-resource APIs. Front ends hold an
//! `App` and never reach for global state.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::api::{ApiClient, ArticleApi, Pipeline, ReqwestTransport, Transport, UserApi};
use crate::auth::{SessionContext, UserStore};
use crate::config::Config;
use crate::router::{Navigation, NavigationError, RouteGuard, RouteTable, Router};
use crate::storage::{FileStorage, LocalStorage};

pub struct App {
    pub config: Config,
    pub session: Arc<SessionContext>,
    pub router: Arc<Router>,
    pub api: ApiClient,
    pub users: UserStore,
    pub user_api: UserApi,
    pub articles: ArticleApi,
}

impl App {
    /// Build the app with file-backed storage and the reqwest transport.
    pub fn new(config: Config) -> Result<Self> {
        let storage_path = config.storage_path()?;
        let storage = FileStorage::open(&storage_path)
            .with_context(|| format!("Failed to open storage at {}", storage_path.display()))?;
        let transport = ReqwestTransport::new(config.request_timeout())
            .context("Failed to build HTTP client")?;
        Ok(Self::with_parts(
            config,
            Arc::new(storage),
            Arc::new(transport),
            RouteTable::default(),
        ))
    }

    pub fn with_parts(
        config: Config,
        storage: Arc<dyn LocalStorage>,
        transport: Arc<dyn Transport>,
        routes: RouteTable,
    ) -> Self {
        let session = Arc::new(SessionContext::restore(storage));
        let guard = RouteGuard::new(session.clone(), config.app_title.clone());
        let router = Arc::new(Router::new(routes, guard));

        let pipeline = Pipeline::standard(session.clone(), router.clone());
        let api = ApiClient::new(&config, transport, pipeline);
        let user_api = UserApi::new(api.clone());
        let users = UserStore::new(session.clone(), router.clone(), user_api.clone());
        let articles = ArticleApi::new(api.clone());

        info!(
            base_url = api.base_url(),
            authenticated = session.is_authenticated(),
            "Forum client ready"
        );

        Self {
            config,
            session,
            router,
            api,
            users,
            user_api,
            articles,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn navigate(&self, path: &str) -> Result<Navigation, NavigationError> {
        self.router.push(path)
    }
}
