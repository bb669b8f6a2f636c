//! In-process books repository.
//!
//! Keeps books in insertion order. Used by the test suites and by local runs
//! configured with `database.url = "memory://"`.

use async_trait::async_trait;
use indexmap::{map::Entry, IndexMap};
use tokio::sync::RwLock;

use super::BooksRepository;
use crate::{
    error::{AppError, AppResult},
    models::{Book, UpdateBook},
};

#[derive(Debug, Default)]
pub struct InMemoryBooksRepository {
    books: RwLock<IndexMap<String, Book>>,
}

impl InMemoryBooksRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BooksRepository for InMemoryBooksRepository {
    async fn insert(&self, book: &Book) -> AppResult<Book> {
        let mut books = self.books.write().await;
        match books.entry(book.isbn.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "Book with ISBN {} already exists",
                book.isbn
            ))),
            Entry::Vacant(slot) => Ok(slot.insert(book.clone()).clone()),
        }
    }

    async fn list_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn get_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        self.books
            .read()
            .await
            .get(isbn)
            .cloned()
            .ok_or_else(|| not_found(isbn))
    }

    async fn update(&self, isbn: &str, data: &UpdateBook) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let book = books.get_mut(isbn).ok_or_else(|| not_found(isbn))?;
        book.apply(data.clone());
        Ok(book.clone())
    }

    async fn delete(&self, isbn: &str) -> AppResult<()> {
        self.books
            .write()
            .await
            .shift_remove(isbn)
            .map(|_| ())
            .ok_or_else(|| not_found(isbn))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

fn not_found(isbn: &str) -> AppError {
    AppError::NotFound(format!("Book {} not found", isbn))
}
