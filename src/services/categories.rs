//! Category management service

use crate::{
    error::{AppError, AppResult},
    models::{
        category::Category,
        user::{Capability, Role},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CategoriesService {
    repository: Repository,
}

impl CategoriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all categories
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.categories.list().await
    }

    /// Get category by ID
    pub async fn get_category(&self, id: i32) -> AppResult<Category> {
        self.repository.categories.get_by_id(id).await
    }

    /// Create a new category
    pub async fn create_category(&self, role: Role, name: &str) -> AppResult<Category> {
        role.require(Capability::ManageCategories)?;
        if self.repository.categories.name_exists(name, None).await? {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }

        self.repository.categories.create(name).await
    }

    /// Rename a category
    pub async fn update_category(&self, role: Role, id: i32, name: &str) -> AppResult<Category> {
        role.require(Capability::ManageCategories)?;
        if self
            .repository
            .categories
            .name_exists(name, Some(id))
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }

        self.repository.categories.update(id, name).await
    }

    /// Delete a category
    pub async fn delete_category(&self, role: Role, id: i32) -> AppResult<()> {
        role.require(Capability::ManageCategories)?;
        self.repository.categories.delete(id).await
    }
}
