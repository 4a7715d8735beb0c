//! Borrow lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::Book,
        borrow::{Borrow, CreateBorrow},
    },
};

use super::AuthenticatedUser;

/// Create borrow request
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    /// Book to borrow
    pub book_id: i32,
    /// Start of the borrow period
    pub borrow_date: DateTime<Utc>,
    /// Due date (must be strictly after borrow_date)
    pub return_date: DateTime<Utc>,
}

/// Borrow response carrying both records as they stand after the transition
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// Created borrow (returned_at is null)
    pub borrow: Borrow,
    /// Book, now marked borrowed
    pub book: Book,
}

/// List all borrows
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All borrows", body = Vec<Borrow>)
    )
)]
pub async fn list_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Borrow>>> {
    let borrows = state.services.borrows.list_borrows().await?;
    Ok(Json(borrows))
}

/// Get a single borrow
#[utoipa::path(
    get,
    path = "/borrows/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow ID")
    ),
    responses(
        (status = 200, description = "Borrow details", body = Borrow),
        (status = 404, description = "Borrow not found")
    )
)]
pub async fn get_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<Borrow>> {
    let borrow = state.services.borrows.get_borrow(borrow_id).await?;
    Ok(Json(borrow))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Borrow created", body = BorrowResponse),
        (status = 400, description = "Invalid dates or book not available"),
        (status = 403, description = "Admins cannot borrow books"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let create = CreateBorrow {
        book_id: request.book_id,
        borrow_date: request.borrow_date,
        return_date: request.return_date,
    };

    let (borrow, book) = state
        .services
        .borrows
        .borrow_book(claims.role, claims.user_id, create)
        .await?;

    Ok((StatusCode::CREATED, Json(BorrowResponse { borrow, book })))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = Borrow),
        (status = 400, description = "Already returned"),
        (status = 404, description = "Borrow not found")
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<Borrow>> {
    let borrow = state.services.borrows.return_book(borrow_id).await?;
    Ok(Json(borrow))
}

/// List borrows held by a user
#[utoipa::path(
    get,
    path = "/users/{id}/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's borrows", body = Vec<Borrow>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<Borrow>>> {
    let borrows = state.services.borrows.get_user_borrows(user_id).await?;
    Ok(Json(borrows))
}
