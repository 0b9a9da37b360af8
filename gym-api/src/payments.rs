use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use gym_booking::input;
use gym_core::AuthUser;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub booking_id: Option<Value>,
    pub amount: Option<Value>,
}

#[derive(Debug, Serialize)]
struct PaymentResponse {
    message: String,
    payment_id: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/payments", post(create_payment))
}

async fn create_payment(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    let Json(req) = payload?;
    let booking_id = input::record_id(req.booking_id.as_ref(), "bookingId")?;
    let amount = input::amount(req.amount.as_ref())?;

    tracing::debug!(caller = caller.id, booking_id, "Payment requested");
    let payment = state.payments.record_payment(booking_id, amount).await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentResponse {
            message: "Payment successful".to_string(),
            payment_id: payment.id,
        }),
    ))
}
