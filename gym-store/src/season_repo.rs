use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use gym_core::repository::SeasonRepository;
use gym_core::{CoreResult, NewSeason, Season};

use crate::store_error;

pub struct StoreSeasonRepository {
    pool: SqlitePool,
}

impl StoreSeasonRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SeasonRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: f64,
    duration: i64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    capacity: i64,
    available_slots: i64,
}

impl From<SeasonRow> for Season {
    fn from(row: SeasonRow) -> Self {
        Season {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            duration: row.duration,
            start_date: row.start_date,
            end_date: row.end_date,
            capacity: row.capacity,
            available_slots: row.available_slots,
        }
    }
}

const SEASON_COLUMNS: &str =
    "id, name, description, price, duration, start_date, end_date, capacity, available_slots";

#[async_trait]
impl SeasonRepository for StoreSeasonRepository {
    async fn list_seasons(&self) -> CoreResult<Vec<Season>> {
        let rows: Vec<SeasonRow> =
            sqlx::query_as(&format!("SELECT {} FROM seasons ORDER BY id", SEASON_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(store_error)?;

        Ok(rows.into_iter().map(Season::from).collect())
    }

    async fn get_season(&self, id: i64) -> CoreResult<Option<Season>> {
        let row: Option<SeasonRow> =
            sqlx::query_as(&format!("SELECT {} FROM seasons WHERE id = ?", SEASON_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;

        Ok(row.map(Season::from))
    }

    async fn create_season(&self, season: &NewSeason) -> CoreResult<Season> {
        season.validate()?;

        let result = sqlx::query(
            r#"
            INSERT INTO seasons (name, description, price, duration, start_date, end_date, capacity, available_slots)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&season.name)
        .bind(&season.description)
        .bind(season.price)
        .bind(season.duration)
        .bind(season.start_date)
        .bind(season.end_date)
        .bind(season.capacity)
        .bind(season.capacity)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(Season {
            id: result.last_insert_rowid(),
            name: season.name.clone(),
            description: season.description.clone(),
            price: season.price,
            duration: season.duration,
            start_date: season.start_date,
            end_date: season.end_date,
            capacity: season.capacity,
            available_slots: season.capacity,
        })
    }

    async fn count_seasons(&self) -> CoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM seasons")
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)
    }
}
