use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use gym_booking::input;
use gym_core::{AuthUser, Booking};

use crate::{error::AppError, state::AppState};

/// Ids arrive as numbers or numeric strings, so fields stay untyped until validated.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub user_id: Option<Value>,
    pub season_id: Option<Value>,
}

#[derive(Debug, Serialize)]
struct BookingResponse {
    message: String,
    booking_id: i64,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

/// Routes that expect an `AuthUser` extension, installed by `require_auth`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", post(create_booking))
        .route("/api/bookings/user/{user_id}", get(list_user_bookings))
        .route("/api/bookings/{id}", delete(cancel_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let Json(req) = payload?;
    let user_id = input::user_id(req.user_id.as_ref())?;
    let season_id = input::record_id(req.season_id.as_ref(), "seasonId")?;

    if user_id != caller.subject() {
        warn!(caller = caller.id, user_id = %user_id, "Booking attempted for another user");
        return Err(AppError::AuthorizationError(
            "Cannot book on behalf of another user".to_string(),
        ));
    }

    let booking = state.admission.admit_booking(&user_id, season_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            message: "Booking successful".to_string(),
            booking_id: booking.id,
        }),
    ))
}

async fn list_user_bookings(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Booking>>, AppError> {
    if user_id != caller.subject() {
        return Err(AppError::AuthorizationError(
            "Cannot view another user's bookings".to_string(),
        ));
    }

    let bookings = state.admission.list_user_bookings(&user_id).await?;
    Ok(Json(bookings))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    state.admission.cancel_booking(id, &caller.subject()).await?;

    Ok(Json(MessageResponse {
        message: "Booking cancelled".to_string(),
    }))
}
