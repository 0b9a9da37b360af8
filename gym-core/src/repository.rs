use async_trait::async_trait;

use crate::{
    Booking, CoreResult, DoublePaymentPolicy, NewSeason, NewUser, Payment, Season, User,
    UserCredentials,
};

/// Repository trait for season data access
#[async_trait]
pub trait SeasonRepository: Send + Sync {
    /// All seasons in store order (ascending id).
    async fn list_seasons(&self) -> CoreResult<Vec<Season>>;

    async fn get_season(&self, id: i64) -> CoreResult<Option<Season>>;

    async fn create_season(&self, season: &NewSeason) -> CoreResult<Season>;

    async fn count_seasons(&self) -> CoreResult<i64>;
}

/// Repository trait for bookings and the capacity they consume
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Claims one slot of `season_id` and inserts a pending booking as a single unit.
    ///
    /// Fails with `SeasonNotFound` or `CapacityExhausted` without changing anything.
    /// Two callers racing for the last slot cannot both succeed.
    async fn admit_booking(&self, user_id: &str, season_id: i64) -> CoreResult<Booking>;

    async fn get_booking(&self, id: i64) -> CoreResult<Option<Booking>>;

    /// Newest first.
    async fn list_bookings_for_user(&self, user_id: &str) -> CoreResult<Vec<Booking>>;

    /// Removes a pending booking owned by `user_id` and returns its slot to the season.
    async fn cancel_booking(&self, id: i64, user_id: &str) -> CoreResult<Booking>;
}

/// Repository trait for payment recording
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Inserts a payment and confirms its booking as a single unit.
    async fn record_payment(
        &self,
        booking_id: i64,
        amount: f64,
        policy: DoublePaymentPolicy,
    ) -> CoreResult<Payment>;
}

/// Repository trait for registered users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateEmail` if the address is taken.
    async fn create_user(&self, user: &NewUser) -> CoreResult<User>;

    async fn find_credentials_by_email(&self, email: &str) -> CoreResult<Option<UserCredentials>>;
}
