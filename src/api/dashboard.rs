//! Dashboard endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, services::dashboard::DashboardSummary};

use super::AuthenticatedUser;

/// Counts for the signed-in user's own view
#[derive(Serialize, ToSchema)]
pub struct UserDashboard {
    /// Borrows currently held by the user
    pub open_borrow_count: i64,
}

/// Library-wide counts
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregate counts", body = DashboardSummary),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<DashboardSummary>> {
    let summary = state.services.dashboard.summary().await?;
    Ok(Json(summary))
}

/// Counts scoped to the authenticated user
#[utoipa::path(
    get,
    path = "/dashboard/me",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User counts", body = UserDashboard)
    )
)]
pub async fn get_user_dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserDashboard>> {
    let open_borrow_count = state
        .services
        .dashboard
        .user_open_borrows(claims.user_id)
        .await?;
    Ok(Json(UserDashboard { open_borrow_count }))
}
