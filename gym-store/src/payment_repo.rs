use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use gym_core::repository::PaymentRepository;
use gym_core::{BookingStatus, CoreError, CoreResult, DoublePaymentPolicy, Payment, PaymentStatus};

use crate::store_error;

pub struct StorePaymentRepository {
    pool: SqlitePool,
}

impl StorePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for StorePaymentRepository {
    async fn record_payment(
        &self,
        booking_id: i64,
        amount: f64,
        policy: DoublePaymentPolicy,
    ) -> CoreResult<Payment> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        // Confirming first takes the write lock before anything is read. Under `Reject`
        // the status guard makes the confirmation itself the double-payment check.
        let confirm_sql = match policy {
            DoublePaymentPolicy::Allow => "UPDATE bookings SET status = ? WHERE id = ?",
            DoublePaymentPolicy::Reject => {
                "UPDATE bookings SET status = ? WHERE id = ? AND status = 'pending'"
            }
        };

        let confirmed = sqlx::query(confirm_sql)
            .bind(BookingStatus::Confirmed.as_str())
            .bind(booking_id)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        if confirmed.rows_affected() == 0 {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM bookings WHERE id = ?")
                .bind(booking_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(store_error)?;

            tx.rollback().await.map_err(store_error)?;

            return Err(match exists {
                Some(_) => CoreError::AlreadyConfirmed(booking_id),
                None => CoreError::BookingNotFound(booking_id),
            });
        }

        let payment_date = Utc::now();
        let status = PaymentStatus::Completed;

        let result = sqlx::query(
            r#"
            INSERT INTO payments (booking_id, amount, payment_date, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(booking_id)
        .bind(amount)
        .bind(payment_date)
        .bind(status.as_str())
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;

        Ok(Payment {
            id: result.last_insert_rowid(),
            booking_id,
            amount,
            payment_date,
            status,
        })
    }
}
