pub mod input;
pub mod catalog;
pub mod admission;
pub mod payment;

#[cfg(test)]
mod testing;

pub use catalog::Catalog;
pub use admission::BookingAdmission;
pub use payment::PaymentRecorder;
