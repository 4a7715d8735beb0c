//! Dashboard aggregate counts

use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, repository::Repository};

/// Aggregate counts for the admin dashboard
#[derive(Serialize, ToSchema)]
pub struct DashboardSummary {
    /// Total number of books in the catalog
    pub book_count: i64,
    /// Total number of categories
    pub category_count: i64,
    /// Total number of borrows, open and closed
    pub borrow_count: i64,
    /// Borrows currently outstanding
    pub open_borrow_count: i64,
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Collect dashboard counts
    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let book_count = self.repository.books.count().await?;
        let category_count = self.repository.categories.count().await?;
        let borrow_count = self.repository.borrows.count().await?;
        let open_borrow_count = self.repository.borrows.count_open().await?;

        Ok(DashboardSummary {
            book_count,
            category_count,
            borrow_count,
            open_borrow_count,
        })
    }

    /// Count open borrows held by one user
    pub async fn user_open_borrows(&self, user_id: i32) -> AppResult<i64> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.borrows.count_open_for_user(user_id).await
    }
}
