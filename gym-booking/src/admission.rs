use std::sync::Arc;

use tracing::info;

use gym_core::repository::BookingRepository;
use gym_core::{Booking, CoreError, CoreResult};

/// Turns season capacity into bookings and back.
///
/// The check-and-decrement itself is delegated to the repository, which performs it as one
/// atomic conditional update inside the same transaction that inserts the booking.
pub struct BookingAdmission {
    bookings: Arc<dyn BookingRepository>,
}

impl BookingAdmission {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn admit_booking(&self, user_id: &str, season_id: i64) -> CoreResult<Booking> {
        if user_id.trim().is_empty() || season_id <= 0 {
            return Err(CoreError::missing_fields());
        }

        match self.bookings.admit_booking(user_id, season_id).await {
            Ok(booking) => {
                info!(booking_id = booking.id, season_id, user_id, "Booking admitted");
                Ok(booking)
            }
            Err(CoreError::CapacityExhausted(id)) => {
                info!(season_id = id, user_id, "Admission refused: no available slots");
                Err(CoreError::CapacityExhausted(id))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn list_user_bookings(&self, user_id: &str) -> CoreResult<Vec<Booking>> {
        self.bookings.list_bookings_for_user(user_id).await
    }

    /// Cancels a pending booking owned by `user_id`, releasing its slot.
    pub async fn cancel_booking(&self, booking_id: i64, user_id: &str) -> CoreResult<Booking> {
        let booking = self.bookings.cancel_booking(booking_id, user_id).await?;
        info!(booking_id, season_id = booking.season_id, user_id, "Booking cancelled, slot released");
        Ok(booking)
    }
}
