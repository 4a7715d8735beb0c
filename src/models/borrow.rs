//! Borrow (loan) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Borrow model from database. A borrow is open while returned_at is NULL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrow {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub borrow_date: DateTime<Utc>,
    /// Due date, strictly after borrow_date
    pub return_date: DateTime<Utc>,
    /// Set exactly once when the book comes back
    pub returned_at: Option<DateTime<Utc>>,
}

/// Create borrow request (acting user comes from the authenticated claims)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBorrow {
    pub book_id: i32,
    pub borrow_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
}
