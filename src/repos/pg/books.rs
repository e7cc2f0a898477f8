/*
 * Responsibility
 * - libros table CRUD
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::book_repo::{Book, BookFields, BookRepo};
use crate::repos::error::RepoResult;
use crate::repos::page::{Page, PageRequest};

#[derive(Debug, FromRow)]
struct BookRow {
    id: i64,
    titulo: String,
    autor: String,
    isbn: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.titulo,
            author: row.autor,
            isbn: row.isbn,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgBookRepo {
    db: PgPool,
}

impl PgBookRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepo for PgBookRepo {
    async fn list(&self, page: PageRequest) -> RepoResult<Page<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, titulo, autor, isbn
            FROM libros
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.db)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM libros")
            .fetch_one(&self.db)
            .await?;

        Ok(Page {
            content: rows.into_iter().map(Book::from).collect(),
            request: page,
            total_elements: total.max(0) as u64,
        })
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, titulo, autor, isbn
            FROM libros
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Book::from))
    }

    async fn create(&self, fields: BookFields) -> RepoResult<Book> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            INSERT INTO libros (titulo, autor, isbn)
            VALUES ($1, $2, $3)
            RETURNING id, titulo, autor, isbn
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(&fields.isbn)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, fields: BookFields) -> RepoResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            UPDATE libros
            SET titulo = $2, autor = $3, isbn = $4
            WHERE id = $1
            RETURNING id, titulo, autor, isbn
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(&fields.isbn)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Book::from))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM libros
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
