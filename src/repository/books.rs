//! Books repository for database operations

use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, Entity},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM book WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(Entity::Book, format!("Book {}", id)))
    }

    /// Get book by ID on the caller's transaction. Lifecycle operations
    /// that already hold a transaction must read through it instead of
    /// checking a second connection out of the pool.
    pub async fn get_by_id_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM book WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(Entity::Book, format!("Book {}", id)))
    }

    /// List books with optional search and category filters
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let pattern = query.search.as_ref().map(|s| format!("%{}%", s));

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM book
            WHERE ($1::text IS NULL OR title ILIKE $1 OR author ILIKE $1)
              AND ($2::int IS NULL OR category_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(pattern)
        .bind(query.category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Create a book owned by the given profile
    pub async fn create(&self, owner_id: Uuid, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO book (
                title, author, description, isbn, published_year, pages, price,
                stock_count, intent, is_active, owner_id, category_id,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE, $10, $11, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(&book.isbn)
        .bind(book.published_year)
        .bind(book.pages)
        .bind(book.price)
        .bind(book.stock_count.unwrap_or(1))
        .bind(book.intent.unwrap_or(crate::models::enums::Intent::Share))
        .bind(owner_id)
        .bind(book.category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a book; fields left out of the payload keep their value
    pub async fn update(&self, id: i32, update: &UpdateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE book SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                description = COALESCE($4, description),
                isbn = COALESCE($5, isbn),
                published_year = COALESCE($6, published_year),
                pages = COALESCE($7, pages),
                price = COALESCE($8, price),
                stock_count = COALESCE($9, stock_count),
                intent = COALESCE($10, intent),
                is_active = COALESCE($11, is_active),
                category_id = COALESCE($12, category_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.author)
        .bind(&update.description)
        .bind(&update.isbn)
        .bind(update.published_year)
        .bind(update.pages)
        .bind(update.price)
        .bind(update.stock_count)
        .bind(update.intent)
        .bind(update.is_active)
        .bind(update.category_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(Entity::Book, format!("Book {}", id)))
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(Entity::Book, format!("Book {}", id)));
        }
        Ok(())
    }
}
