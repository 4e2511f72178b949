use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserSummary;

/// Page used when a list call does not specify one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when a list call does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: i64,
    /// Author, filled in by the server on list and detail responses.
    pub user: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn author_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.username.as_str())
            .unwrap_or("unknown")
    }

    pub fn was_edited(&self) -> bool {
        self.updated_at > self.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ArticlePage {
    #[serde(default)]
    pub articles: Vec<Article>,
    pub total: i64,
    pub page: u32,
    pub size: u32,
}

impl ArticlePage {
    pub fn total_pages(&self) -> i64 {
        if self.size == 0 {
            return 0;
        }
        let size = i64::from(self.size);
        (self.total + size - 1) / size
    }

    pub fn has_next(&self) -> bool {
        i64::from(self.page) < self.total_pages()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ArticleStats {
    pub total_articles: i64,
    pub total_users: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters for the article list. Unset page/size fall back to 1 and 10.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub search: Option<String>,
    pub user_id: Option<i64>,
    pub sort_by: Option<SortField>,
    pub order: Option<SortOrder>,
}

impl ArticleQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn by_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = Some(field);
        self.order = Some(order);
        self
    }

    /// Query-string pairs in a stable order; page and size are always present.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.unwrap_or(DEFAULT_PAGE).to_string()),
            ("size".to_string(), self.size.unwrap_or(DEFAULT_PAGE_SIZE).to_string()),
        ];
        if let Some(ref term) = self.search {
            pairs.push(("search".to_string(), term.clone()));
        }
        if let Some(user_id) = self.user_id {
            pairs.push(("user_id".to_string(), user_id.to_string()));
        }
        if let Some(field) = self.sort_by {
            pairs.push(("sort_by".to_string(), field.to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order".to_string(), order.to_string()));
        }
        pairs
    }
}
