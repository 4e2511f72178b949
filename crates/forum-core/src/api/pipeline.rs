//! Request pipeline: ordered hooks around every API call.
//!
//! Request hooks run in order before the transport sends. Response hooks run
//! in order after a response (or a transport failure) comes back, before the
//! caller sees the result.

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use tracing::{debug, warn};

use crate::auth::{sign_out, SessionContext};
use crate::router::Router;

use super::transport::{OutgoingRequest, RawResponse};
use super::ApiError;

pub trait RequestHook: Send + Sync {
    fn before_send(&self, request: &mut OutgoingRequest) -> Result<(), ApiError>;
}

pub trait ResponseHook: Send + Sync {
    fn on_response(&self, _request: &OutgoingRequest, _response: &RawResponse) {}

    /// Called for every failed call, whether or not a response arrived.
    fn on_error(&self, _request: &OutgoingRequest, _error: &ApiError) {}
}

#[derive(Clone, Default)]
pub struct Pipeline {
    request_hooks: Vec<Arc<dyn RequestHook>>,
    response_hooks: Vec<Arc<dyn ResponseHook>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard pipeline: request logging, bearer credential, and forced
    /// logout on 401.
    pub fn standard(session: Arc<SessionContext>, router: Arc<Router>) -> Self {
        let log = Arc::new(RequestLog);
        Self::new()
            .with_request_hook(log.clone())
            .with_request_hook(Arc::new(BearerAuth::new(session.clone())))
            .with_response_hook(log)
            .with_response_hook(Arc::new(LogoutOnUnauthorized::new(session, router)))
    }

    pub fn with_request_hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.request_hooks.push(hook);
        self
    }

    pub fn with_response_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.response_hooks.push(hook);
        self
    }

    pub(crate) fn before_send(&self, request: &mut OutgoingRequest) -> Result<(), ApiError> {
        for hook in &self.request_hooks {
            hook.before_send(request)?;
        }
        Ok(())
    }

    pub(crate) fn on_response(&self, request: &OutgoingRequest, response: &RawResponse) {
        for hook in &self.response_hooks {
            hook.on_response(request, response);
        }
    }

    pub(crate) fn on_error(&self, request: &OutgoingRequest, error: &ApiError) {
        for hook in &self.response_hooks {
            hook.on_error(request, error);
        }
    }
}

/// Attaches `Authorization: Bearer <token>` while a session exists.
pub struct BearerAuth {
    session: Arc<SessionContext>,
}

impl BearerAuth {
    pub fn new(session: Arc<SessionContext>) -> Self {
        Self { session }
    }
}

impl RequestHook for BearerAuth {
    fn before_send(&self, request: &mut OutgoingRequest) -> Result<(), ApiError> {
        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidRequest(format!("Invalid token header: {}", e)))?;
            request.headers.insert(AUTHORIZATION, value);
        }
        Ok(())
    }
}

/// Clears the session and sends the user to the login page whenever the
/// server answers 401. The failed call is still rejected to its caller.
pub struct LogoutOnUnauthorized {
    session: Arc<SessionContext>,
    router: Arc<Router>,
}

impl LogoutOnUnauthorized {
    pub fn new(session: Arc<SessionContext>, router: Arc<Router>) -> Self {
        Self { session, router }
    }
}

impl ResponseHook for LogoutOnUnauthorized {
    fn on_error(&self, request: &OutgoingRequest, error: &ApiError) {
        if error.is_unauthorized() {
            warn!(method = %request.method, path = %request.path, "Unauthorized response, signing out");
            sign_out(&self.session, &self.router);
        }
    }
}

/// Debug logging for each call. Never logs headers, so the credential stays
/// out of the logs.
pub struct RequestLog;

impl RequestHook for RequestLog {
    fn before_send(&self, request: &mut OutgoingRequest) -> Result<(), ApiError> {
        debug!(method = %request.method, path = %request.path, "Sending request");
        Ok(())
    }
}

impl ResponseHook for RequestLog {
    fn on_response(&self, request: &OutgoingRequest, response: &RawResponse) {
        debug!(method = %request.method, path = %request.path, status = response.status, "Response received");
    }

    fn on_error(&self, request: &OutgoingRequest, error: &ApiError) {
        debug!(method = %request.method, path = %request.path, error = %error, "Request failed");
    }
}
