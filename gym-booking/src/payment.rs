use std::sync::Arc;

use tracing::info;

use gym_core::repository::PaymentRepository;
use gym_core::{CoreError, CoreResult, DoublePaymentPolicy, Payment};

pub struct PaymentRecorder {
    payments: Arc<dyn PaymentRepository>,
    policy: DoublePaymentPolicy,
}

impl PaymentRecorder {
    pub fn new(payments: Arc<dyn PaymentRepository>, policy: DoublePaymentPolicy) -> Self {
        Self { payments, policy }
    }

    pub fn policy(&self) -> DoublePaymentPolicy {
        self.policy
    }

    /// Records a payment and confirms the booking it pays for
    pub async fn record_payment(&self, booking_id: i64, amount: f64) -> CoreResult<Payment> {
        if booking_id <= 0 || amount == 0.0 {
            return Err(CoreError::missing_fields());
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::ValidationError("Invalid amount".to_string()));
        }

        let payment = self.payments.record_payment(booking_id, amount, self.policy).await?;
        info!(payment_id = payment.id, booking_id, amount, "Payment recorded, booking confirmed");
        Ok(payment)
    }
}
