//! Authentication routes
//!
//! Back-office login against the `users` table.

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::ApiJson;
use crate::app::AppState;
use crate::domain::auth::{LoginRequest, LoginResponse};
use crate::error::ApiError;

/// Database row for a back-office user
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    password: String,
    mobile: Option<String>,
}

/// POST /login
///
/// Check a name/password pair and return the user on success.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (name, password) = req
        .credentials()
        .ok_or_else(|| ApiError::bad_request("Missing credentials"))?;

    let user = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, name, password, mobile
        FROM users
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(&state.db)
    .await?;

    match user {
        Some(user) if user.password == password => {
            tracing::info!(user_id = user.id, "User logged in");
            Ok(Json(LoginResponse {
                id: user.id,
                name: user.name,
                mobile: user.mobile,
            }))
        }
        _ => {
            tracing::info!(name = %name, "Rejected login");
            Err(ApiError::Unauthorized("Invalid user or password".to_string()))
        }
    }
}
