//! In-memory movie store

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::FilmeContext;
use crate::models::{Filme, NewFilme};

#[derive(Debug)]
struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Filme>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

/// Movie store kept in process memory; ids start at 1 and are never reused
#[derive(Debug, Default)]
pub struct InMemoryFilmeRepository {
    table: RwLock<Table>,
}

impl InMemoryFilmeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FilmeContext for InMemoryFilmeRepository {
    async fn add(&self, filme: NewFilme) -> DatabaseResult<Filme> {
        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id = id
            .checked_add(1)
            .ok_or_else(|| DatabaseError::Capacity("filme identifiers are exhausted".to_string()))?;

        let stored = Filme {
            id,
            title: filme.title,
            genre: filme.genre,
            duration: filme.duration,
            release_date: filme.release_date,
        };
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list(&self, skip: u64, take: u64) -> DatabaseResult<Vec<Filme>> {
        let table = self.table.read().await;
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let take = usize::try_from(take).unwrap_or(usize::MAX);
        Ok(table.rows.values().skip(skip).take(take).cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<Filme>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn save(&self, filme: &Filme) -> DatabaseResult<bool> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&filme.id) {
            Some(row) => {
                *row = filme.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: i32) -> DatabaseResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
