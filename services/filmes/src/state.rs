//! Application state shared across handlers

use std::sync::Arc;

use crate::repositories::FilmeContext;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub filmes: Arc<dyn FilmeContext>,
}

impl AppState {
    pub fn new(filmes: Arc<dyn FilmeContext>) -> Self {
        Self { filmes }
    }
}
