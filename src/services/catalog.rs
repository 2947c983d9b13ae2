//! Book catalog service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.list(query).await
    }

    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a book owned by the caller. The profile is created on
    /// first contact since identity is issued externally.
    pub async fn create(
        &self,
        owner_id: Uuid,
        username: Option<&str>,
        book: &CreateBook,
    ) -> AppResult<Book> {
        self.repository.profiles.ensure(owner_id, username).await?;
        self.repository.books.create(owner_id, book).await
    }

    /// Update a book; owner only
    pub async fn update(&self, id: i32, actor: Uuid, update: &UpdateBook) -> AppResult<Book> {
        let book = self.repository.books.get_by_id(id).await?;
        if book.owner_id != actor {
            return Err(AppError::Forbidden(
                "Only the owner may update this book".to_string(),
            ));
        }
        self.repository.books.update(id, update).await
    }

    /// Delete a book; owner only, refused while reservations are open
    pub async fn delete(&self, id: i32, actor: Uuid) -> AppResult<()> {
        let book = self.repository.books.get_by_id(id).await?;
        if book.owner_id != actor {
            return Err(AppError::Forbidden(
                "Only the owner may delete this book".to_string(),
            ));
        }
        if self
            .repository
            .reservations
            .book_has_open_reservations(id)
            .await?
        {
            return Err(AppError::Conflict(
                "Book still has pending or active reservations".to_string(),
            ));
        }
        self.repository.books.delete(id).await
    }
}
