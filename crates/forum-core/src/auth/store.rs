use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{ApiError, UserApi};
use crate::models::{AuthPayload, UserProfile};
use crate::router::{Router, HOME_PATH, LOGIN_PATH};

use super::SessionContext;

/// Clear the session and navigate to the login page.
///
/// Shared by explicit logout and the 401 response hook. Never fails.
pub fn sign_out(session: &SessionContext, router: &Router) {
    session.clear();
    if let Err(e) = router.push(LOGIN_PATH) {
        warn!(error = %e, "Failed to navigate to login after sign out");
    }
}

/// Login, registration and logout flows on top of the session.
#[derive(Clone)]
pub struct UserStore {
    session: Arc<SessionContext>,
    router: Arc<Router>,
    users: UserApi,
}

impl UserStore {
    pub fn new(session: Arc<SessionContext>, router: Arc<Router>, users: UserApi) -> Self {
        Self {
            session,
            router,
            users,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn user_info(&self) -> UserProfile {
        self.session.user_info()
    }

    /// Sign in and go to the home page. On failure the session is untouched
    /// and the server's error is returned as-is.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let payload = self.users.login(email, password).await?;
        self.start_session(payload)
    }

    /// Create an account, sign in with it and go to the home page.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ApiError> {
        let payload = self
            .users
            .register(username, email, password, password)
            .await?;
        self.start_session(payload)
    }

    pub fn logout(&self) {
        info!("Signing out");
        sign_out(&self.session, &self.router);
    }

    fn start_session(&self, payload: AuthPayload) -> Result<UserProfile, ApiError> {
        if payload.token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "Login response did not include a token".to_string(),
            ));
        }

        let AuthPayload { token, user } = payload;
        if let Err(e) = self.session.establish(&token, user.clone()) {
            warn!(error = %e, "Signed in, but the session could not be saved");
        }
        info!(user = user.display_name(), "Signed in");

        if let Err(e) = self.router.push(HOME_PATH) {
            warn!(error = %e, "Failed to navigate home after sign in");
        }
        Ok(user)
    }
}
