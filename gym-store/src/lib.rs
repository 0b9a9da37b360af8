pub mod app_config;
pub mod database;
pub mod season_repo;
pub mod booking_repo;
pub mod payment_repo;
pub mod user_repo;

pub use database::DbClient;
pub use season_repo::StoreSeasonRepository;
pub use booking_repo::StoreBookingRepository;
pub use payment_repo::StorePaymentRepository;
pub use user_repo::StoreUserRepository;

use gym_core::CoreError;

pub(crate) fn store_error(err: sqlx::Error) -> CoreError {
    CoreError::InternalError(err.to_string())
}
