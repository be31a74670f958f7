use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::models::{Book, BookFilter, NewBook, Review};

#[async_trait]
pub trait BookStore: Send + Sync {
    async fn search(&self, filter: &BookFilter) -> Vec<Book>;

    async fn insert(&self, new: NewBook) -> Book;

    /// Marks an available book as issued. Fails for unknown ids and for
    /// books that are already out.
    async fn issue(&self, id: i64) -> Result<Book, StoreError>;

    /// Marks an issued book as returned. Fails for unknown ids and for
    /// books that are not out.
    async fn give_back(&self, id: i64) -> Result<Book, StoreError>;

    async fn add_review(&self, id: i64, review: Review) -> Result<Vec<Review>, StoreError>;

    async fn reviews(&self, id: i64) -> Result<Vec<Review>, StoreError>;
}

struct Inner {
    books: Vec<Book>,
    next_id: i64,
}

pub struct MemoryBookStore {
    inner: RwLock<Inner>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                books: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Store pre-loaded with the demo catalog.
    pub fn seeded() -> Self {
        let catalog = [
            (
                "The Automobile Handbook 2024",
                "Jack Gillis",
                "Automobile",
                "https://placehold.co/300x200?text=Automobile+Handbook",
            ),
            (
                "Understanding Automobiles",
                "Tom Newton",
                "Automobile",
                "https://placehold.co/300x200?text=Understanding+Automobiles",
            ),
            (
                "The Complete Train Manual",
                "Rail Works",
                "Train",
                "https://placehold.co/300x200?text=Train+Manual",
            ),
            (
                "Flight Basics for Beginners",
                "Amelia Earhart",
                "Flight",
                "https://placehold.co/300x200?text=Flight+Basics",
            ),
            (
                "The Art of Flight",
                "Leonardo da Vinci",
                "Flight",
                "https://placehold.co/300x200?text=Art+of+Flight",
            ),
        ];

        let books = catalog
            .iter()
            .enumerate()
            .map(|(i, (title, author, category, cover))| Book {
                id: i as i64 + 1,
                title: title.to_string(),
                author: author.to_string(),
                category: category.to_string(),
                issued: false,
                cover: cover.to_string(),
                reviews: Vec::new(),
            })
            .collect::<Vec<_>>();

        let next_id = books.len() as i64 + 1;
        Self {
            inner: RwLock::new(Inner { books, next_id }),
        }
    }
}

impl Default for MemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(book: &Book, filter: &BookFilter) -> bool {
    let title_ok = filter
        .title
        .as_ref()
        .map_or(true, |t| book.title.to_lowercase().contains(&t.to_lowercase()));
    let author_ok = filter
        .author
        .as_ref()
        .map_or(true, |a| book.author.to_lowercase().contains(&a.to_lowercase()));
    let category_ok = filter
        .category
        .as_ref()
        .map_or(true, |c| book.category.eq_ignore_ascii_case(c));

    title_ok && author_ok && category_ok
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn search(&self, filter: &BookFilter) -> Vec<Book> {
        self.inner
            .read()
            .await
            .books
            .iter()
            .filter(|b| matches(b, filter))
            .cloned()
            .collect()
    }

    async fn insert(&self, new: NewBook) -> Book {
        let mut inner = self.inner.write().await;

        let book = Book {
            id: inner.next_id,
            title: new.title,
            author: new.author,
            category: new.category,
            issued: false,
            cover: new.cover,
            reviews: Vec::new(),
        };
        inner.next_id += 1;
        inner.books.push(book.clone());

        book
    }

    async fn issue(&self, id: i64) -> Result<Book, StoreError> {
        let mut inner = self.inner.write().await;

        match inner.books.iter_mut().find(|b| b.id == id) {
            Some(book) if !book.issued => {
                book.issued = true;
                Ok(book.clone())
            }
            _ => Err(StoreError::BookUnavailable),
        }
    }

    async fn give_back(&self, id: i64) -> Result<Book, StoreError> {
        let mut inner = self.inner.write().await;

        match inner.books.iter_mut().find(|b| b.id == id) {
            Some(book) if book.issued => {
                book.issued = false;
                Ok(book.clone())
            }
            _ => Err(StoreError::BookNotIssued),
        }
    }

    async fn add_review(&self, id: i64, review: Review) -> Result<Vec<Review>, StoreError> {
        let mut inner = self.inner.write().await;

        let book = inner
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StoreError::BookNotFound)?;

        book.reviews.push(review);
        Ok(book.reviews.clone())
    }

    async fn reviews(&self, id: i64) -> Result<Vec<Review>, StoreError> {
        self.inner
            .read()
            .await
            .books
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.reviews.clone())
            .ok_or(StoreError::BookNotFound)
    }
}
