use std::sync::Arc;

use gym_booking::{BookingAdmission, Catalog, PaymentRecorder};
use gym_core::DoublePaymentPolicy;
use gym_store::{
    DbClient, StoreBookingRepository, StorePaymentRepository, StoreSeasonRepository,
    StoreUserRepository,
};

use crate::identity::AuthService;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub admission: Arc<BookingAdmission>,
    pub payments: Arc<PaymentRecorder>,
    pub identity: Arc<AuthService>,
}

impl AppState {
    /// Wires every service to the sqlx-backed repositories sharing `db`'s pool.
    pub fn new(db: &DbClient, auth: AuthConfig, double_payment: DoublePaymentPolicy) -> Self {
        let pool = db.pool.clone();

        Self {
            catalog: Arc::new(Catalog::new(Arc::new(StoreSeasonRepository::new(pool.clone())))),
            admission: Arc::new(BookingAdmission::new(Arc::new(StoreBookingRepository::new(
                pool.clone(),
            )))),
            payments: Arc::new(PaymentRecorder::new(
                Arc::new(StorePaymentRepository::new(pool.clone())),
                double_payment,
            )),
            identity: Arc::new(AuthService::new(Arc::new(StoreUserRepository::new(pool)), auth)),
        }
    }
}
