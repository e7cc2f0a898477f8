/*
 * Responsibility
 * - Libros の request/response DTO (wire 名は titulo / autor / isbn)
 */
use serde::{Deserialize, Serialize};

use crate::repos::book_repo::{Book, BookFields};

#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub titulo: String,
    pub autor: String,
    pub isbn: String,
}

impl BookRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.titulo.trim().is_empty() {
            return Err("titulo is required");
        }
        if self.autor.trim().is_empty() {
            return Err("autor is required");
        }
        if self.isbn.trim().is_empty() {
            return Err("isbn is required");
        }
        Ok(())
    }

    pub fn into_fields(self) -> BookFields {
        BookFields {
            title: self.titulo.trim().to_string(),
            author: self.autor.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: i64,
    pub titulo: String,
    pub autor: String,
    pub isbn: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            titulo: book.title,
            autor: book.author,
            isbn: book.isbn,
        }
    }
}
