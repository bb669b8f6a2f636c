//! Repository layer for book storage

pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, UpdateBook},
};

pub use books::PgBooksRepository;
pub use memory::InMemoryBooksRepository;

/// Storage operations on the `books` table, keyed by ISBN.
///
/// Every operation touches a single row with a single statement. Expected
/// outcomes come back as typed errors: `AppError::Conflict` for a duplicate
/// ISBN on insert, `AppError::NotFound` when no row matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksRepository: Send + Sync {
    /// Store a new book and return the persisted row
    async fn insert(&self, book: &Book) -> AppResult<Book>;

    /// Every stored book; empty store yields an empty list
    async fn list_all(&self) -> AppResult<Vec<Book>>;

    async fn get_by_isbn(&self, isbn: &str) -> AppResult<Book>;

    /// Replace all non-key fields of the book stored under `isbn`
    async fn update(&self, isbn: &str, data: &UpdateBook) -> AppResult<Book>;

    async fn delete(&self, isbn: &str) -> AppResult<()>;

    /// Cheap round trip to the store, for readiness checks
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct handed to the services
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BooksRepository>,
}

impl Repository {
    /// Repository over a PostgreSQL pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self::with_books(Arc::new(PgBooksRepository::new(pool)))
    }

    /// Repository keeping everything in process memory
    pub fn in_memory() -> Self {
        Self::with_books(Arc::new(InMemoryBooksRepository::new()))
    }

    pub fn with_books(books: Arc<dyn BooksRepository>) -> Self {
        Self { books }
    }
}
