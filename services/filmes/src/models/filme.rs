//! Movie entity and the DTOs exposed over HTTP

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Number of records returned by a listing when `take` is not given
pub const DEFAULT_TAKE: i64 = 50;

/// Movie entity as stored in the `filmes` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Filme {
    pub id: i32,
    pub title: String,
    pub genre: String,
    /// Running time in minutes
    pub duration: i32,
    pub release_date: Option<NaiveDate>,
}

/// Movie attributes before the store assigns an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct NewFilme {
    pub title: String,
    pub genre: String,
    pub duration: i32,
    pub release_date: Option<NaiveDate>,
}

/// Request body for `POST /Filme`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFilmeDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "The movie title is required and must have at most 100 characters"
    ))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 50,
        message = "The genre is required and must have at most 50 characters"
    ))]
    pub genre: String,
    #[validate(range(
        min = 70,
        max = 600,
        message = "The duration must be between 70 and 600 minutes"
    ))]
    pub duration: i32,
    pub release_date: Option<NaiveDate>,
}

/// Response body for reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadFilmeDto {
    pub id: i32,
    pub title: String,
    pub genre: String,
    pub duration: i32,
    pub release_date: Option<NaiveDate>,
}

/// Request body for `PUT /Filme/{id}` and the document a `PATCH` is applied to
///
/// Unknown members (such as an echoed `id`) are ignored here. The PATCH flow
/// checks the patched document's members itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateFilmeDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "The movie title is required and must have at most 100 characters"
    ))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 50,
        message = "The genre is required and must have at most 50 characters"
    ))]
    pub genre: String,
    #[validate(range(
        min = 70,
        max = 600,
        message = "The duration must be between 70 and 600 minutes"
    ))]
    pub duration: i32,
    pub release_date: Option<NaiveDate>,
}

/// Query parameters for `GET /Filme`
#[derive(Debug, Clone, Deserialize)]
pub struct FilmeQuery {
    /// Number of records to skip (default 0)
    #[serde(default)]
    pub skip: i64,
    /// Maximum number of records to return (default 50)
    #[serde(default = "default_take")]
    pub take: i64,
}

fn default_take() -> i64 {
    DEFAULT_TAKE
}

impl FilmeQuery {
    /// Skip and take clamped to non-negative values.
    ///
    /// A negative skip starts from the beginning, a negative take selects nothing.
    pub fn bounds(&self) -> (u64, u64) {
        (self.skip.max(0) as u64, self.take.max(0) as u64)
    }
}
