//! Plain-text rendering for command output.

use chrono::{DateTime, Utc};
use forum_core::api::ApiError;
use forum_core::models::{Article, ArticlePage, UserProfile};

/// Width of the content preview in article listings.
const PREVIEW_LENGTH: usize = 60;

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Collapse whitespace runs (including newlines) into single spaces
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %d, %Y %H:%M").to_string()
}

pub fn article_line(article: &Article) -> String {
    format!(
        "#{:<5} {} ({}, {})\n       {}",
        article.id,
        article.title,
        article.author_name(),
        format_date(&article.created_at),
        truncate_string(&single_line(&article.content), PREVIEW_LENGTH)
    )
}

pub fn article_page(page: &ArticlePage) -> String {
    if page.articles.is_empty() {
        return format!("No articles (page {}).", page.page);
    }
    let mut out: Vec<String> = page.articles.iter().map(article_line).collect();
    out.push(format!(
        "Page {} of {} ({} articles)",
        page.page,
        page.total_pages().max(1),
        page.total
    ));
    out.join("\n")
}

pub fn article_detail(article: &Article) -> String {
    let mut header = format!(
        "{}\nby {} on {}",
        article.title,
        article.author_name(),
        format_date(&article.created_at)
    );
    if article.was_edited() {
        header.push_str(&format!(" (edited {})", format_date(&article.updated_at)));
    }
    format!("{}\n\n{}", header, article.content)
}

pub fn profile(profile: &UserProfile) -> String {
    match (profile.username(), profile.email()) {
        (Some(name), Some(email)) => format!("{} <{}>", name, email),
        _ => profile.display_name().to_string(),
    }
}

/// Message for a failed call, preferring the server's own wording.
pub fn api_error(error: &ApiError) -> String {
    match error.error_body().and_then(|b| b.message()) {
        Some(message) => message.to_string(),
        None => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_core::api::ErrorBody;
    use serde_json::json;

    fn article(content: &str) -> Article {
        serde_json::from_value(json!({
            "id": 3,
            "title": "Hello",
            "content": content,
            "user_id": 1,
            "user": {"id": 1, "username": "ada", "email": "ada@example.com"},
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("你好世界", 3), "你好世");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\n\n  b\tc "), "a b c");
    }

    #[test]
    fn test_article_line() {
        let line = article_line(&article("First\npost"));
        assert!(line.starts_with("#3"));
        assert!(line.contains("Hello (ada, May 01, 2024 10:00)"));
        assert!(line.ends_with("First post"));
    }

    #[test]
    fn test_empty_page() {
        let page = ArticlePage {
            articles: Vec::new(),
            total: 0,
            page: 2,
            size: 10,
        };
        assert_eq!(article_page(&page), "No articles (page 2).");
    }

    #[test]
    fn test_api_error_prefers_server_message() {
        let err = ApiError::Rejected {
            status: 400,
            error: ErrorBody::with_message(400, "email already exists"),
        };
        assert_eq!(api_error(&err), "email already exists");
        assert_eq!(api_error(&ApiError::RateLimited), "Rate limited - please wait before retrying");
    }
}
