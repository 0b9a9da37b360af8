use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use gym_booking::input::required_text;
use gym_core::{CoreError, User};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Debug, Serialize)]
struct RegisterResponse {
    message: String,
    user: UserResponse,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    user: UserResponse,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(req) = payload?;
    let email = required_text(req.email.as_deref())?;
    let name = required_text(req.name.as_deref())?;
    let password = required_password(req.password.as_deref())?;

    let user = state.identity.register(email, password, name).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: user.into(),
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = payload?;
    let email = required_text(req.email.as_deref())?;
    let password = required_password(req.password.as_deref())?;

    let (token, user) = state.identity.login(email, password).await?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Passwords are taken verbatim, surrounding whitespace included.
fn required_password(value: Option<&str>) -> Result<&str, CoreError> {
    match value {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(CoreError::missing_fields()),
    }
}
