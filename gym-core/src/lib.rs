pub mod season;
pub mod booking;
pub mod payment;
pub mod identity;
pub mod repository;

pub use season::{NewSeason, Season};
pub use booking::{Booking, BookingStatus};
pub use payment::{DoublePaymentPolicy, Payment, PaymentStatus};
pub use identity::{AuthUser, NewUser, User, UserCredentials};

/// Error taxonomy shared by every layer. The `Display` text of each variant is what
/// clients see in the `{"error": ...}` body, except for `InternalError`.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Season not found")]
    SeasonNotFound(i64),
    #[error("Booking not found")]
    BookingNotFound(i64),
    #[error("No available slots")]
    CapacityExhausted(i64),
    #[error("Booking is already confirmed")]
    AlreadyConfirmed(i64),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl CoreError {
    pub fn missing_fields() -> Self {
        CoreError::ValidationError("Missing required fields".to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
