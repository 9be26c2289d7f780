//! PostgreSQL movie repository

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, migrate::Migrator};
use tracing::info;

use super::FilmeContext;
use crate::models::{Filme, NewFilme};

/// Schema migrations for the `filmes`, `enderecos` and `cinemas` tables
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Movie repository for database operations
#[derive(Clone)]
pub struct FilmeRepository {
    pool: PgPool,
}

impl FilmeRepository {
    /// Create a new movie repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FilmeContext for FilmeRepository {
    async fn add(&self, filme: NewFilme) -> DatabaseResult<Filme> {
        info!("Creating filme: {}", filme.title);

        sqlx::query_as::<_, Filme>(
            r#"
            INSERT INTO filmes (title, genre, duration, release_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, genre, duration, release_date
            "#,
        )
        .bind(&filme.title)
        .bind(&filme.genre)
        .bind(filme.duration)
        .bind(filme.release_date)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    async fn list(&self, skip: u64, take: u64) -> DatabaseResult<Vec<Filme>> {
        sqlx::query_as::<_, Filme>(
            r#"
            SELECT id, title, genre, duration, release_date
            FROM filmes
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::try_from(take).unwrap_or(i64::MAX))
        .bind(i64::try_from(skip).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<Filme>> {
        sqlx::query_as::<_, Filme>(
            r#"
            SELECT id, title, genre, duration, release_date
            FROM filmes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    async fn save(&self, filme: &Filme) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE filmes
            SET title = $2, genre = $3, duration = $4, release_date = $5
            WHERE id = $1
            "#,
        )
        .bind(filme.id)
        .bind(&filme.title)
        .bind(&filme.genre)
        .bind(filme.duration)
        .bind(filme.release_date)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, id: i32) -> DatabaseResult<bool> {
        info!("Deleting filme {}", id);

        let result = sqlx::query("DELETE FROM filmes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}
