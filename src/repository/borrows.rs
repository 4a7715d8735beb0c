//! Borrows repository for database operations
//!
//! Owns the book status transitions. Both the borrow and the return path
//! run inside a single transaction; dropping the transaction on any error
//! path rolls everything back, so a book is never observable as borrowed
//! without its borrow row (or vice versa).

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookStatus},
        borrow::{Borrow, CreateBorrow},
    },
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrow> {
        sqlx::query_as::<_, Borrow>("SELECT * FROM borrows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow with id {} not found", id)))
    }

    /// List all borrows
    pub async fn list(&self) -> AppResult<Vec<Borrow>> {
        let borrows = sqlx::query_as::<_, Borrow>("SELECT * FROM borrows ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(borrows)
    }

    /// List borrows held by a user
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Borrow>> {
        let borrows = sqlx::query_as::<_, Borrow>(
            "SELECT * FROM borrows WHERE user_id = $1 ORDER BY borrow_date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(borrows)
    }

    /// Count open borrows held by a user
    pub async fn count_open_for_user(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrows WHERE user_id = $1 AND returned_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count all borrows
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrows")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count open borrows
    pub async fn count_open(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrows WHERE returned_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Create a new borrow, flipping the book to borrowed.
    ///
    /// The row lock taken by FOR UPDATE serializes concurrent borrow
    /// attempts on the same book: the second transaction blocks until the
    /// first commits, re-reads the status as borrowed and fails the
    /// precondition. Books are locked individually, so borrows of
    /// different books proceed in parallel.
    pub async fn create(&self, user_id: i32, request: &CreateBorrow) -> AppResult<(Borrow, Book)> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(request.book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Book with id {} not found", request.book_id))
            })?;

        if book.status != BookStatus::Available {
            return Err(AppError::BusinessRule(
                "Book is not available for borrowing".to_string(),
            ));
        }

        let book = sqlx::query_as::<_, Book>(
            "UPDATE books SET status = 'borrowed' WHERE id = $1 RETURNING *",
        )
        .bind(request.book_id)
        .fetch_one(&mut *tx)
        .await?;

        let borrow = sqlx::query_as::<_, Borrow>(
            r#"
            INSERT INTO borrows (book_id, user_id, borrow_date, return_date, returned_at)
            VALUES ($1, $2, $3, $4, NULL)
            RETURNING *
            "#,
        )
        .bind(request.book_id)
        .bind(user_id)
        .bind(request.borrow_date)
        .bind(request.return_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((borrow, book))
    }

    /// Close a borrow, flipping the book back to available.
    ///
    /// Both writes share one transaction so a crash between them cannot
    /// leave a returned borrow against a still-borrowed book.
    pub async fn return_borrow(&self, borrow_id: i32) -> AppResult<Borrow> {
        let mut tx = self.pool.begin().await?;

        let borrow = sqlx::query_as::<_, Borrow>("SELECT * FROM borrows WHERE id = $1 FOR UPDATE")
            .bind(borrow_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow with id {} not found", borrow_id)))?;

        if borrow.returned_at.is_some() {
            return Err(AppError::BusinessRule(
                "Book has already been returned".to_string(),
            ));
        }

        let borrow = sqlx::query_as::<_, Borrow>(
            "UPDATE borrows SET returned_at = $1 WHERE id = $2 RETURNING *",
        )
        .bind(Utc::now())
        .bind(borrow_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET status = 'available' WHERE id = $1")
            .bind(borrow.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(borrow)
    }
}
