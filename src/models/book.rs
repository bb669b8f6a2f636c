//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book record as stored in the `books` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
pub struct Book {
    /// ISBN, primary key. Cannot be changed once the book exists.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub amazon_url: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub language: String,
    pub pages: i32,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub publisher: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    pub year: i32,
}

/// Full replacement of a book's mutable fields (everything but the ISBN)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub amazon_url: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub language: String,
    pub pages: i32,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub publisher: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    pub year: i32,
}

impl Book {
    /// Apply an update, keeping the ISBN untouched
    pub fn apply(&mut self, changes: UpdateBook) {
        self.amazon_url = changes.amazon_url;
        self.author = changes.author;
        self.language = changes.language;
        self.pages = changes.pages;
        self.publisher = changes.publisher;
        self.title = changes.title;
        self.year = changes.year;
    }

    /// Build the stored row for `isbn` from an update payload
    pub fn with_isbn(isbn: impl Into<String>, data: UpdateBook) -> Self {
        Self {
            isbn: isbn.into(),
            amazon_url: data.amazon_url,
            author: data.author,
            language: data.language,
            pages: data.pages,
            publisher: data.publisher,
            title: data.title,
            year: data.year,
        }
    }
}

/// Single book envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub book: Book,
}

/// Book list envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

/// Acknowledgment body, returned by delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
