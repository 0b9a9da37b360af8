use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use gym_core::repository::SeasonRepository;
use gym_core::{CoreResult, NewSeason};

use crate::season_repo::StoreSeasonRepository;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Sqlite>,
}

impl DbClient {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        // WAL plus a busy timeout lets concurrent writers queue on the database lock
        let options = SqliteConnectOptions::from_str(connection_string)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Private in-memory database. Every pooled connection to `sqlite::memory:` would
    /// open its own empty database, so the pool is pinned to one long-lived connection.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    /// Inserts the configured seasons when the catalog is empty. Returns how many were added.
    pub async fn seed_seasons(&self, seasons: &[NewSeason]) -> CoreResult<usize> {
        let repo = StoreSeasonRepository::new(self.pool.clone());

        if seasons.is_empty() || repo.count_seasons().await? > 0 {
            return Ok(0);
        }

        for season in seasons {
            let created = repo.create_season(season).await?;
            info!(season_id = created.id, name = %created.name, capacity = created.capacity, "Seeded season");
        }

        Ok(seasons.len())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed.");
    }
}
