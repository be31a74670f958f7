use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    // bcrypt hash - never serialize
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub user: String,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category: String,
    pub issued: bool,
    pub cover: String,
    pub reviews: Vec<Review>,
}

/// Fields accepted when adding a book; id, issued flag and reviews are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub category: String,
    pub cover: String,
}

/// Search filter for the book list. Doubles as the query-string shape of
/// `GET /books`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
}
