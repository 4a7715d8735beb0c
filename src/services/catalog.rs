//! Book catalog service

use chrono::{Datelike, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookSummary, CreateBook, UpdateBook},
        user::{Capability, Role},
    },
    repository::Repository,
};

/// Publication year must be plausible: 1000 up to next year.
fn validate_year(year: i32) -> AppResult<()> {
    let max_year = Utc::now().year() + 1;
    if !(1000..=max_year).contains(&year) {
        return Err(AppError::Validation(format!(
            "Year must be between 1000 and {}",
            max_year
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books with their category, paginated
    pub async fn list_books(
        &self,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<BookSummary>, i64)> {
        self.repository.books.list(page, per_page).await
    }

    /// List available books, de-duplicated across identical editions
    pub async fn list_available_books(
        &self,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<BookSummary>, i64)> {
        self.repository.books.list_available(page, per_page).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Add a book to the catalog
    pub async fn create_book(&self, role: Role, book: CreateBook) -> AppResult<Book> {
        role.require(Capability::ManageCatalog)?;
        validate_year(book.year)?;
        if !self.repository.categories.exists(book.category_id).await? {
            return Err(AppError::Validation(format!(
                "Category with id {} does not exist",
                book.category_id
            )));
        }

        self.repository.books.create(&book).await
    }

    /// Update a catalog entry
    pub async fn update_book(&self, role: Role, id: i32, update: UpdateBook) -> AppResult<Book> {
        role.require(Capability::ManageCatalog)?;
        if let Some(year) = update.year {
            validate_year(year)?;
        }
        if let Some(category_id) = update.category_id {
            if !self.repository.categories.exists(category_id).await? {
                return Err(AppError::Validation(format!(
                    "Category with id {} does not exist",
                    category_id
                )));
            }
        }

        self.repository.books.update(id, &update).await
    }

    /// Remove a book from the catalog
    pub async fn delete_book(&self, role: Role, id: i32) -> AppResult<()> {
        role.require(Capability::ManageCatalog)?;
        self.repository.books.delete(id).await
    }

    /// Place a book under maintenance (no-op when not available)
    pub async fn set_maintenance(&self, role: Role, id: i32) -> AppResult<Book> {
        role.require(Capability::ManageCatalog)?;
        self.repository.books.set_maintenance(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_years() {
        assert!(validate_year(1000).is_ok());
        assert!(validate_year(1984).is_ok());
        assert!(validate_year(Utc::now().year()).is_ok());
        assert!(validate_year(Utc::now().year() + 1).is_ok());
    }

    #[test]
    fn rejects_implausible_years() {
        assert!(validate_year(999).is_err());
        assert!(validate_year(-50).is_err());
        assert!(validate_year(Utc::now().year() + 2).is_err());
    }
}
