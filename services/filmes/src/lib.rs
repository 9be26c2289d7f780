//! Filmes API
//!
//! CRUD service for movie records: `POST/GET /Filme` and
//! `GET/PUT/PATCH/DELETE /Filme/{id}`, backed by PostgreSQL or an
//! in-memory store.

pub mod config;
pub mod error;
pub mod mapper;
pub mod models;
pub mod patch;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;
