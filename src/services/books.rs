//! Book catalog service.
//!
//! Sits between the HTTP handlers and the repository: payloads are validated
//! here, the ISBN from the request path is the only key ever used for updates
//! and deletes, and repository outcomes are passed up as typed errors.

use serde_json::Value;

use super::validation;
use crate::{error::AppResult, models::Book, repository::Repository};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a book from a raw payload
    pub async fn create(&self, payload: &Value) -> AppResult<Book> {
        let book = validation::validate_create(payload).map_err(|violations| {
            tracing::debug!(count = violations.len(), "Rejected book create payload");
            violations
        })?;

        let created = self.repository.books.insert(&book).await?;
        tracing::info!(isbn = %created.isbn, "Book created");
        Ok(created)
    }

    /// List every book
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_all().await
    }

    /// Get a book by ISBN
    pub async fn get(&self, isbn: &str) -> AppResult<Book> {
        self.repository.books.get_by_isbn(isbn).await
    }

    /// Replace every mutable field of the book stored under `isbn`.
    /// The payload itself may not carry an `isbn`.
    pub async fn update(&self, isbn: &str, payload: &Value) -> AppResult<Book> {
        let changes = validation::validate_update(payload).map_err(|violations| {
            tracing::debug!(isbn = %isbn, count = violations.len(), "Rejected book update payload");
            violations
        })?;

        let updated = self.repository.books.update(isbn, &changes).await?;
        tracing::info!(isbn = %updated.isbn, "Book updated");
        Ok(updated)
    }

    /// Delete a book by ISBN
    pub async fn delete(&self, isbn: &str) -> AppResult<()> {
        self.repository.books.delete(isbn).await?;
        tracing::info!(isbn = %isbn, "Book deleted");
        Ok(())
    }

    /// Check that the store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.books.ping().await
    }
}
