//! Business logic services

pub mod auth;
pub mod borrows;
pub mod catalog;
pub mod categories;
pub mod dashboard;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub borrows: borrows::BorrowsService,
    pub catalog: catalog::CatalogService,
    pub categories: categories::CategoriesService,
    pub dashboard: dashboard::DashboardService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            borrows: borrows::BorrowsService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            categories: categories::CategoriesService::new(repository.clone()),
            dashboard: dashboard::DashboardService::new(repository),
        }
    }
}
