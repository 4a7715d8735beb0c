//! Borrow lifecycle service
//!
//! All role checks take the acting role as an explicit parameter rather
//! than reading it from ambient request context, so the rules are unit
//! testable without simulating requests.

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        borrow::{Borrow, CreateBorrow},
        user::{Capability, Role},
    },
    repository::Repository,
};

/// Due date must fall strictly after the borrow date.
pub fn validate_borrow_dates(request: &CreateBorrow) -> AppResult<()> {
    if request.return_date <= request.borrow_date {
        return Err(AppError::Validation(
            "return_date must be after borrow_date".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
}

impl BorrowsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for the acting user
    pub async fn borrow_book(
        &self,
        role: Role,
        user_id: i32,
        request: CreateBorrow,
    ) -> AppResult<(Borrow, Book)> {
        role.require(Capability::BorrowBooks)?;
        validate_borrow_dates(&request)?;

        self.repository.borrows.create(user_id, &request).await
    }

    /// Return a borrowed book
    pub async fn return_book(&self, borrow_id: i32) -> AppResult<Borrow> {
        self.repository.borrows.return_borrow(borrow_id).await
    }

    /// Get a single borrow
    pub async fn get_borrow(&self, borrow_id: i32) -> AppResult<Borrow> {
        self.repository.borrows.get_by_id(borrow_id).await
    }

    /// List all borrows
    pub async fn list_borrows(&self) -> AppResult<Vec<Borrow>> {
        self.repository.borrows.list().await
    }

    /// List borrows held by a user
    pub async fn get_user_borrows(&self, user_id: i32) -> AppResult<Vec<Borrow>> {
        // Verify user exists
        self.repository.users.get_by_id(user_id).await?;
        self.repository.borrows.list_for_user(user_id).await
    }
}
