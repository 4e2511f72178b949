use serde::Serialize;

use crate::models::{AuthPayload, UserDetail, UserSummary};

use super::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    re_password: &'a str,
}

/// User endpoints.
#[derive(Clone)]
pub struct UserApi {
    client: ApiClient,
}

impl UserApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        self.client
            .post("/user/login", &LoginRequest { email, password })
            .await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        re_password: &str,
    ) -> Result<AuthPayload, ApiError> {
        let body = RegisterRequest {
            username,
            email,
            password,
            re_password,
        };
        self.client.post("/user/register", &body).await
    }

    pub async fn get(&self, id: i64) -> Result<UserSummary, ApiError> {
        self.client.get(&format!("/users/{}", id), Vec::new()).await
    }

    /// User summary with article count.
    pub async fn detail(&self, id: i64) -> Result<UserDetail, ApiError> {
        self.client
            .get(&format!("/users/{}/detail", id), Vec::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::mock::MockTransport;
    use crate::api::Pipeline;
    use crate::config::Config;
    use reqwest::Method;
    use serde_json::json;
    use std::sync::Arc;

    fn api() -> (Arc<MockTransport>, UserApi) {
        let transport = Arc::new(MockTransport::new());
        let client = ApiClient::new(&Config::default(), transport.clone(), Pipeline::new());
        (transport, UserApi::new(client))
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let (transport, api) = api();
        transport.respond(
            Method::POST,
            "/user/login",
            200,
            json!({"data": {"token": "jwt", "user": {"id": 1, "username": "ada"}}}),
        );

        let payload = api.login("ada@example.com", "secret").await.unwrap();
        assert_eq!(payload.token, "jwt");

        let req = transport.last_request();
        assert_eq!(req.method, Method::POST);
        assert_eq!(
            req.body,
            Some(json!({"email": "ada@example.com", "password": "secret"}))
        );
    }

    #[tokio::test]
    async fn test_register_posts_confirmation() {
        let (transport, api) = api();
        transport.respond(
            Method::POST,
            "/user/register",
            200,
            json!({"data": {"token": "jwt", "user": {"id": 2}}}),
        );

        api.register("bob", "bob@example.com", "pw", "pw2").await.unwrap();
        assert_eq!(
            transport.last_request().body,
            Some(json!({
                "username": "bob",
                "email": "bob@example.com",
                "password": "pw",
                "re_password": "pw2"
            }))
        );
    }

    #[tokio::test]
    async fn test_user_lookups_use_id_paths() {
        let (transport, api) = api();
        transport.respond(
            Method::GET,
            "/users/4",
            200,
            json!({"data": {"id": 4, "username": "cy", "email": "cy@example.com"}}),
        );
        transport.respond(
            Method::GET,
            "/users/4/detail",
            200,
            json!({"data": {"id": 4, "username": "cy", "email": "cy@example.com", "article_count": 2}}),
        );

        assert_eq!(api.get(4).await.unwrap().username, "cy");
        assert_eq!(api.detail(4).await.unwrap().article_count, 2);
    }
}
