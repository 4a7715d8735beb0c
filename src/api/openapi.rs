//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, borrows, categories, dashboard, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Alexandria API",
        version = "1.0.0",
        description = "Library Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::list_available_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::set_maintenance,
        // Categories
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Borrows
        borrows::list_borrows,
        borrows::get_borrow,
        borrows::create_borrow,
        borrows::return_borrow,
        borrows::get_user_borrows,
        // Dashboard
        dashboard::get_dashboard,
        dashboard::get_user_dashboard,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Books
            crate::models::book::Book,
            crate::models::book::BookStatus,
            crate::models::book::BookSummary,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::api::PaginatedBooks,
            // Categories
            crate::models::category::Category,
            crate::models::category::CategoryRef,
            crate::models::category::CategoryPayload,
            // Borrows
            crate::models::borrow::Borrow,
            borrows::BorrowRequest,
            borrows::BorrowResponse,
            // Users
            crate::models::user::User,
            crate::models::user::Role,
            // Dashboard
            crate::services::dashboard::DashboardSummary,
            dashboard::UserDashboard,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "categories", description = "Category management"),
        (name = "borrows", description = "Borrow and return lifecycle"),
        (name = "dashboard", description = "Aggregate counts")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
