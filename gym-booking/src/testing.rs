//! In-memory repository used by the service tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use gym_core::repository::{BookingRepository, PaymentRepository, SeasonRepository};
use gym_core::{
    Booking, BookingStatus, CoreError, CoreResult, DoublePaymentPolicy, NewSeason, Payment,
    PaymentStatus, Season,
};

pub fn season(capacity: i64, available_slots: i64) -> Season {
    Season {
        id: 0,
        name: "Test Season".to_string(),
        description: None,
        price: 50.0,
        duration: 4,
        start_date: Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap(),
        end_date: Utc.with_ymd_and_hms(2025, 2, 3, 0, 0, 0).unwrap(),
        capacity,
        available_slots,
    }
}

#[derive(Default)]
struct State {
    seasons: BTreeMap<i64, Season>,
    bookings: BTreeMap<i64, Booking>,
    payments: Vec<Payment>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// One lock around all tables stands in for the store's transactions.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn add_season(&self, mut season: Season) -> i64 {
        let mut state = self.state.lock().unwrap();
        season.id = state.next_id();
        let id = season.id;
        state.seasons.insert(id, season);
        id
    }

    pub fn available_slots(&self, season_id: i64) -> i64 {
        self.state.lock().unwrap().seasons[&season_id].available_slots
    }

    pub fn booking_count(&self) -> usize {
        self.state.lock().unwrap().bookings.len()
    }

    pub fn booking_status(&self, booking_id: i64) -> Option<BookingStatus> {
        self.state.lock().unwrap().bookings.get(&booking_id).map(|b| b.status)
    }

    pub fn payment_count(&self) -> usize {
        self.state.lock().unwrap().payments.len()
    }
}

#[async_trait]
impl SeasonRepository for MemoryStore {
    async fn list_seasons(&self) -> CoreResult<Vec<Season>> {
        Ok(self.state.lock().unwrap().seasons.values().cloned().collect())
    }

    async fn get_season(&self, id: i64) -> CoreResult<Option<Season>> {
        Ok(self.state.lock().unwrap().seasons.get(&id).cloned())
    }

    async fn create_season(&self, new: &NewSeason) -> CoreResult<Season> {
        new.validate()?;
        let mut season = season(new.capacity, new.capacity);
        season.name = new.name.clone();
        let id = self.add_season(season);
        Ok(self.state.lock().unwrap().seasons[&id].clone())
    }

    async fn count_seasons(&self) -> CoreResult<i64> {
        Ok(self.state.lock().unwrap().seasons.len() as i64)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn admit_booking(&self, user_id: &str, season_id: i64) -> CoreResult<Booking> {
        let mut state = self.state.lock().unwrap();
        let season = state
            .seasons
            .get_mut(&season_id)
            .ok_or(CoreError::SeasonNotFound(season_id))?;
        if season.is_full() {
            return Err(CoreError::CapacityExhausted(season_id));
        }
        season.available_slots -= 1;

        let booking = Booking {
            id: state.next_id(),
            user_id: user_id.to_string(),
            season_id,
            booking_date: Utc::now(),
            status: BookingStatus::Pending,
        };
        state.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: i64) -> CoreResult<Option<Booking>> {
        Ok(self.state.lock().unwrap().bookings.get(&id).cloned())
    }

    async fn list_bookings_for_user(&self, user_id: &str) -> CoreResult<Vec<Booking>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bookings
            .values()
            .rev()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn cancel_booking(&self, id: i64, user_id: &str) -> CoreResult<Booking> {
        let mut state = self.state.lock().unwrap();
        match state.bookings.get(&id) {
            Some(b) if b.user_id != user_id => return Err(CoreError::BookingNotFound(id)),
            Some(b) if b.status == BookingStatus::Confirmed => return Err(CoreError::AlreadyConfirmed(id)),
            Some(_) => {}
            None => return Err(CoreError::BookingNotFound(id)),
        }

        let booking = state.bookings.remove(&id).ok_or(CoreError::BookingNotFound(id))?;
        if let Some(season) = state.seasons.get_mut(&booking.season_id) {
            season.available_slots = (season.available_slots + 1).min(season.capacity);
        }
        Ok(booking)
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn record_payment(
        &self,
        booking_id: i64,
        amount: f64,
        policy: DoublePaymentPolicy,
    ) -> CoreResult<Payment> {
        let mut state = self.state.lock().unwrap();
        let booking = state
            .bookings
            .get_mut(&booking_id)
            .ok_or(CoreError::BookingNotFound(booking_id))?;
        if policy == DoublePaymentPolicy::Reject && booking.status == BookingStatus::Confirmed {
            return Err(CoreError::AlreadyConfirmed(booking_id));
        }
        booking.status = BookingStatus::Confirmed;

        let payment = Payment {
            id: state.next_id(),
            booking_id,
            amount,
            payment_date: Utc::now(),
            status: PaymentStatus::Completed,
        };
        state.payments.push(payment.clone());
        Ok(payment)
    }
}
