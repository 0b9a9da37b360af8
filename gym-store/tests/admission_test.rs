use std::sync::Arc;

use chrono::{TimeZone, Utc};
use gym_core::repository::{BookingRepository, SeasonRepository};
use gym_core::{BookingStatus, CoreError, NewSeason, Season};
use gym_store::{DbClient, StoreBookingRepository, StoreSeasonRepository};

fn season_with_capacity(capacity: i64) -> NewSeason {
    NewSeason {
        name: "Spring Strength".to_string(),
        description: Some("Barbell basics".to_string()),
        price: 120.0,
        duration: 12,
        start_date: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        end_date: Utc.with_ymd_and_hms(2025, 5, 24, 0, 0, 0).unwrap(),
        capacity,
    }
}

async fn setup() -> (DbClient, StoreSeasonRepository, StoreBookingRepository) {
    let db = DbClient::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    let seasons = StoreSeasonRepository::new(db.pool.clone());
    let bookings = StoreBookingRepository::new(db.pool.clone());
    (db, seasons, bookings)
}

async fn booking_count(db: &DbClient) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(&db.pool)
        .await
        .unwrap()
}

async fn current(seasons: &StoreSeasonRepository, season: &Season) -> Season {
    seasons.get_season(season.id).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_listing_reports_full_capacity_before_bookings() {
    let (_db, seasons, _) = setup().await;
    seasons.create_season(&season_with_capacity(10)).await.unwrap();
    seasons.create_season(&season_with_capacity(3)).await.unwrap();

    let listed = seasons.list_seasons().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].id < listed[1].id);
    assert_eq!(listed[0].available_slots, 10);
    assert_eq!(listed[1].available_slots, 3);
}

#[tokio::test]
async fn test_admission_decrements_slots_and_creates_pending_booking() {
    let (db, seasons, bookings) = setup().await;
    let season = seasons.create_season(&season_with_capacity(10)).await.unwrap();

    let booking = bookings.admit_booking("u1", season.id).await.unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.user_id, "u1");
    assert_eq!(current(&seasons, &season).await.available_slots, 9);
    assert_eq!(booking_count(&db).await, 1);

    let stored = bookings.get_booking(booking.id).await.unwrap().unwrap();
    assert_eq!(stored.season_id, season.id);
    assert_eq!(stored.user_id, "u1");
    assert_eq!(stored.status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_admission_with_no_slots_changes_nothing() {
    let (db, seasons, bookings) = setup().await;
    let season = seasons.create_season(&season_with_capacity(0)).await.unwrap();

    let err = bookings.admit_booking("u1", season.id).await.unwrap_err();

    assert_eq!(err, CoreError::CapacityExhausted(season.id));
    assert_eq!(current(&seasons, &season).await, season);
    assert_eq!(booking_count(&db).await, 0);
}

#[tokio::test]
async fn test_admission_for_unknown_season() {
    let (db, _, bookings) = setup().await;

    let err = bookings.admit_booking("u1", 404).await.unwrap_err();

    assert_eq!(err, CoreError::SeasonNotFound(404));
    assert_eq!(booking_count(&db).await, 0);
}

#[tokio::test]
async fn test_slots_never_go_negative() {
    let (db, seasons, bookings) = setup().await;
    let season = seasons.create_season(&season_with_capacity(2)).await.unwrap();

    bookings.admit_booking("u1", season.id).await.unwrap();
    bookings.admit_booking("u2", season.id).await.unwrap();
    let err = bookings.admit_booking("u3", season.id).await.unwrap_err();

    assert!(matches!(err, CoreError::CapacityExhausted(_)));
    assert_eq!(current(&seasons, &season).await.available_slots, 0);
    assert_eq!(booking_count(&db).await, 2);
}

#[tokio::test]
async fn test_cancel_pending_booking_returns_slot() {
    let (db, seasons, bookings) = setup().await;
    let season = seasons.create_season(&season_with_capacity(1)).await.unwrap();
    let booking = bookings.admit_booking("u1", season.id).await.unwrap();

    // Other users cannot see or cancel it
    let err = bookings.cancel_booking(booking.id, "u2").await.unwrap_err();
    assert_eq!(err, CoreError::BookingNotFound(booking.id));

    let cancelled = bookings.cancel_booking(booking.id, "u1").await.unwrap();
    assert_eq!(cancelled.id, booking.id);
    assert_eq!(current(&seasons, &season).await.available_slots, 1);
    assert_eq!(booking_count(&db).await, 0);

    let err = bookings.cancel_booking(booking.id, "u1").await.unwrap_err();
    assert_eq!(err, CoreError::BookingNotFound(booking.id));
}

#[tokio::test]
async fn test_list_bookings_newest_first() {
    let (_db, seasons, bookings) = setup().await;
    let season = seasons.create_season(&season_with_capacity(5)).await.unwrap();

    let first = bookings.admit_booking("u1", season.id).await.unwrap();
    bookings.admit_booking("u2", season.id).await.unwrap();
    let second = bookings.admit_booking("u1", season.id).await.unwrap();

    let mine = bookings.list_bookings_for_user("u1").await.unwrap();
    let ids: Vec<i64> = mine.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn test_concurrent_admissions_for_last_slot() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("gym.db").display());
    let db = DbClient::new(&url, 8).await.unwrap();
    db.migrate().await.unwrap();

    let seasons = StoreSeasonRepository::new(db.pool.clone());
    let season = seasons.create_season(&season_with_capacity(1)).await.unwrap();
    let bookings = Arc::new(StoreBookingRepository::new(db.pool.clone()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let bookings = bookings.clone();
        let season_id = season.id;
        handles.push(tokio::spawn(async move {
            bookings.admit_booking(&format!("user-{}", i), season_id).await
        }));
    }

    let mut admitted = 0;
    let mut exhausted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(CoreError::CapacityExhausted(_)) => exhausted += 1,
            Err(other) => panic!("unexpected admission error: {:?}", other),
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(exhausted, 7);
    assert_eq!(current(&seasons, &season).await.available_slots, 0);
    assert_eq!(booking_count(&db).await, 1);

    db.close().await;
}
