use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use gym_core::repository::UserRepository;
use gym_core::{CoreError, CoreResult, NewUser, User, UserCredentials};

use crate::store_error;

pub struct StoreUserRepository {
    pool: SqlitePool,
}

impl StoreUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password: String,
    name: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl UserRepository for StoreUserRepository {
    async fn create_user(&self, user: &NewUser) -> CoreResult<User> {
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password, name, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                CoreError::DuplicateEmail
            } else {
                store_error(e)
            }
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at,
        })
    }

    async fn find_credentials_by_email(&self, email: &str) -> CoreResult<Option<UserCredentials>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password, name, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(|row| UserCredentials {
            user: User {
                id: row.id,
                email: row.email,
                name: row.name,
                created_at: row.created_at,
            },
            password_hash: row.password,
        }))
    }
}
