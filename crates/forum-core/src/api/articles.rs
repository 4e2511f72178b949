use serde::Serialize;

use crate::models::{Article, ArticlePage, ArticleQuery, ArticleStats};

use super::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct ArticleBody<'a> {
    title: &'a str,
    content: &'a str,
}

/// Article endpoints.
#[derive(Clone)]
pub struct ArticleApi {
    client: ApiClient,
}

impl ArticleApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// One page of articles. `None` means page 1 / size 10.
    pub async fn list(&self, page: Option<u32>, size: Option<u32>) -> Result<ArticlePage, ApiError> {
        self.search(&ArticleQuery {
            page,
            size,
            ..ArticleQuery::default()
        })
        .await
    }

    /// Article list with search, author filter and sorting.
    pub async fn search(&self, query: &ArticleQuery) -> Result<ArticlePage, ApiError> {
        self.client.get("/articles", query.to_pairs()).await
    }

    pub async fn get(&self, id: i64) -> Result<Article, ApiError> {
        self.client.get(&format!("/articles/{}", id), Vec::new()).await
    }

    pub async fn create(&self, title: &str, content: &str) -> Result<Article, ApiError> {
        self.client
            .post("/articles", &ArticleBody { title, content })
            .await
    }

    pub async fn update(&self, id: i64, title: &str, content: &str) -> Result<Article, ApiError> {
        self.client
            .put(&format!("/articles/{}", id), &ArticleBody { title, content })
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/articles/{}", id)).await
    }

    pub async fn stats(&self) -> Result<ArticleStats, ApiError> {
        self.client.get("/articles/stats", Vec::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::mock::MockTransport;
    use crate::api::Pipeline;
    use crate::config::Config;
    use crate::models::{SortField, SortOrder};
    use reqwest::Method;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn api() -> (Arc<MockTransport>, ArticleApi) {
        let transport = Arc::new(MockTransport::new());
        let client = ApiClient::new(&Config::default(), transport.clone(), Pipeline::new());
        (transport, ArticleApi::new(client))
    }

    fn article_json(id: i64) -> Value {
        json!({
            "id": id,
            "title": "Title",
            "content": "Body",
            "user_id": 1,
            "user": {"id": 1, "username": "ada", "email": "ada@example.com"},
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        })
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[tokio::test]
    async fn test_list_defaults_to_first_page_of_ten() {
        let (transport, api) = api();
        transport.respond(
            Method::GET,
            "/articles",
            200,
            json!({"data": {"articles": [], "total": 0, "page": 1, "size": 10}}),
        );

        let page = api.list(None, None).await.unwrap();
        assert!(page.articles.is_empty());
        assert_eq!(
            transport.last_request().query,
            vec![pair("page", "1"), pair("size", "10")]
        );
    }

    #[tokio::test]
    async fn test_search_forwards_filters() {
        let (transport, api) = api();
        transport.respond(
            Method::GET,
            "/articles",
            200,
            json!({"data": {"articles": [article_json(1)], "total": 1, "page": 2, "size": 5}}),
        );

        let query = ArticleQuery::default()
            .page(2)
            .size(5)
            .search("rust")
            .sort(SortField::UpdatedAt, SortOrder::Desc);
        let page = api.search(&query).await.unwrap();
        assert_eq!(page.articles[0].id, 1);
        assert_eq!(
            transport.last_request().query,
            vec![
                pair("page", "2"),
                pair("size", "5"),
                pair("search", "rust"),
                pair("sort_by", "updated_at"),
                pair("order", "desc"),
            ]
        );
    }

    #[tokio::test]
    async fn test_crud_paths_and_bodies() {
        let (transport, api) = api();
        transport.respond(Method::GET, "/articles/7", 200, json!({"data": article_json(7)}));
        transport.respond(Method::POST, "/articles", 200, json!({"data": article_json(8)}));
        transport.respond(Method::PUT, "/articles/7", 200, json!({"data": article_json(7)}));
        transport.respond(Method::DELETE, "/articles/7", 200, json!({"data": null}));

        assert_eq!(api.get(7).await.unwrap().id, 7);

        assert_eq!(api.create("New", "Text").await.unwrap().id, 8);
        assert_eq!(
            transport.last_request().body,
            Some(json!({"title": "New", "content": "Text"}))
        );

        api.update(7, "Edited", "More").await.unwrap();
        let req = transport.last_request();
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.body, Some(json!({"title": "Edited", "content": "More"})));

        api.delete(7).await.unwrap();
        let req = transport.last_request();
        assert_eq!(req.method, Method::DELETE);
        assert_eq!(req.path, "/articles/7");
        assert_eq!(req.body, None);
    }

    #[tokio::test]
    async fn test_stats() {
        let (transport, api) = api();
        transport.respond(
            Method::GET,
            "/articles/stats",
            200,
            json!({"data": {"total_articles": 12, "total_users": 3}}),
        );

        let stats = api.stats().await.unwrap();
        assert_eq!(stats.total_articles, 12);
        assert_eq!(stats.total_users, 3);
    }

    #[tokio::test]
    async fn test_errors_pass_through_unchanged() {
        let (transport, api) = api();
        transport.respond(
            Method::GET,
            "/articles/99",
            404,
            json!({"code": 404, "message": "Article not found"}),
        );

        let err = api.get(99).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Request rejected (404): Article not found");
    }
}
