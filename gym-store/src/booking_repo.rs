use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::warn;

use gym_core::repository::BookingRepository;
use gym_core::{Booking, BookingStatus, CoreError, CoreResult};

use crate::store_error;

pub struct StoreBookingRepository {
    pool: SqlitePool,
}

impl StoreBookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    user_id: String,
    season_id: i64,
    booking_date: DateTime<Utc>,
    status: String,
}

impl TryFrom<BookingRow> for Booking {
    type Error = CoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            user_id: row.user_id,
            season_id: row.season_id,
            booking_date: row.booking_date,
            status: row.status.parse()?,
        })
    }
}

#[async_trait]
impl BookingRepository for StoreBookingRepository {
    async fn admit_booking(&self, user_id: &str, season_id: i64) -> CoreResult<Booking> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        // Check and decrement in one statement: the row only changes while a slot is left,
        // so concurrent admissions for the last slot cannot both see it.
        let claimed = sqlx::query(
            "UPDATE seasons SET available_slots = available_slots - 1 WHERE id = ? AND available_slots > 0",
        )
        .bind(season_id)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;

        if claimed.rows_affected() == 0 {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM seasons WHERE id = ?")
                .bind(season_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(store_error)?;

            tx.rollback().await.map_err(store_error)?;

            return Err(match exists {
                Some(_) => CoreError::CapacityExhausted(season_id),
                None => CoreError::SeasonNotFound(season_id),
            });
        }

        let booking_date = Utc::now();
        let status = BookingStatus::Pending;

        let result = sqlx::query(
            r#"
            INSERT INTO bookings (user_id, season_id, booking_date, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(season_id)
        .bind(booking_date)
        .bind(status.as_str())
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;

        Ok(Booking {
            id: result.last_insert_rowid(),
            user_id: user_id.to_string(),
            season_id,
            booking_date,
            status,
        })
    }

    async fn get_booking(&self, id: i64) -> CoreResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(
            "SELECT id, user_id, season_id, booking_date, status FROM bookings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Booking::try_from).transpose()
    }

    async fn list_bookings_for_user(&self, user_id: &str) -> CoreResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            "SELECT id, user_id, season_id, booking_date, status FROM bookings WHERE user_id = ? ORDER BY id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn cancel_booking(&self, id: i64, user_id: &str) -> CoreResult<Booking> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let removed: Option<BookingRow> = sqlx::query_as(
            r#"
            DELETE FROM bookings
            WHERE id = ? AND user_id = ? AND status = ?
            RETURNING id, user_id, season_id, booking_date, status
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(BookingStatus::Pending.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(store_error)?;

        let Some(removed) = removed else {
            let existing: Option<(String, String)> =
                sqlx::query_as("SELECT user_id, status FROM bookings WHERE id = ?")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(store_error)?;

            tx.rollback().await.map_err(store_error)?;

            // Someone else's booking is reported as missing rather than forbidden
            return Err(match existing {
                Some((owner, status)) if owner == user_id && status != BookingStatus::Pending.as_str() => {
                    CoreError::AlreadyConfirmed(id)
                }
                _ => CoreError::BookingNotFound(id),
            });
        };

        let released = sqlx::query(
            "UPDATE seasons SET available_slots = available_slots + 1 WHERE id = ? AND available_slots < capacity",
        )
        .bind(removed.season_id)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;

        if released.rows_affected() == 0 {
            warn!(booking_id = id, season_id = removed.season_id, "Season already at capacity while releasing a slot");
        }

        tx.commit().await.map_err(store_error)?;

        Booking::try_from(removed)
    }
}
