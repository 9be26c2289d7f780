//! Persistence context for movie records
//!
//! Handlers only talk to [`FilmeContext`]. The PostgreSQL implementation
//! backs the running service; the in-memory one backs tests and the
//! `memory` storage mode.

use async_trait::async_trait;
use common::error::DatabaseResult;

use crate::models::{Filme, NewFilme};

pub mod filme;
pub mod memory;

pub use filme::{FilmeRepository, MIGRATOR};
pub use memory::InMemoryFilmeRepository;

/// Collection-like access to stored movies
#[async_trait]
pub trait FilmeContext: Send + Sync {
    /// Store a new movie and return it with its assigned id
    async fn add(&self, filme: NewFilme) -> DatabaseResult<Filme>;

    /// Movies in id order, skipping `skip` and returning at most `take`
    async fn list(&self, skip: u64, take: u64) -> DatabaseResult<Vec<Filme>>;

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<Filme>>;

    /// Persist every field of `filme`; false if no row has its id
    async fn save(&self, filme: &Filme) -> DatabaseResult<bool>;

    /// Delete by id; false if nothing was deleted
    async fn remove(&self, id: i32) -> DatabaseResult<bool>;
}
