//! Domain DTOs for the todo API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently; the
//! end-to-end tests catch drift between the two crates. Optional request
//! fields are left out of the JSON entirely when unset so the server applies
//! its own defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Study,
    Life,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Study => "study",
            Category::Life => "life",
        }
    }
}

/// Ordering applied by the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Highest priority first, newest first within a priority.
    Priority,
    /// Newest first. The server's default.
    CreatedAt,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Priority => "priority",
            SortBy::CreatedAt => "created_at",
        }
    }
}

/// Filters for `GET /todos`. `None` leaves the parameter off the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub category: Option<Category>,
    pub sort: Option<SortBy>,
}

impl ListQuery {
    pub fn to_pairs(self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category {
            pairs.push(("category".to_string(), category.as_str().to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort".to_string(), sort.as_str().to_string()));
        }
        pairs
    }
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub completed: bool,
    /// Optimistic-lock counter; every successful write bumps it by one.
    #[serde(default)]
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for `POST /todos`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

impl CreateTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Request payload for `PUT /todos/{id}`. `version` must be the value last
/// read; a stale one is answered with 409.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    pub version: u32,
}

/// Request payload for `PUT /todos/{id}/status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateStatus {
    pub completed: bool,
    pub version: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_todo_omits_unset_fields() {
        let body = serde_json::to_value(CreateTodo::new("x")).unwrap();
        assert_eq!(body, serde_json::json!({ "title": "x" }));
    }

    #[test]
    fn update_todo_always_carries_version() {
        let input = UpdateTodo {
            priority: Some(3),
            version: 7,
            ..UpdateTodo::default()
        };
        let body = serde_json::to_value(input).unwrap();
        assert_eq!(body, serde_json::json!({ "priority": 3, "version": 7 }));
    }

    #[test]
    fn category_uses_lowercase_wire_names() {
        let body = serde_json::to_value(Category::Study).unwrap();
        assert_eq!(body, "study");
        let back: Category = serde_json::from_str(r#""work""#).unwrap();
        assert_eq!(back, Category::Work);
    }

    #[test]
    fn list_query_pairs_skip_missing_filters() {
        assert!(ListQuery::default().to_pairs().is_empty());
        let query = ListQuery {
            category: Some(Category::Life),
            sort: Some(SortBy::CreatedAt),
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("category".to_string(), "life".to_string()),
                ("sort".to_string(), "created_at".to_string()),
            ]
        );
    }

    #[test]
    fn todo_parses_server_json() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":1,"title":"Read","description":"","category":"study","priority":2,
                "completed":false,"version":0,
                "created_at":"2025-01-02T03:04:05Z","updated_at":"2025-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert_eq!(todo.id, 1);
        assert_eq!(todo.category, Category::Study);
        assert_eq!(todo.priority, 2);
    }
}
