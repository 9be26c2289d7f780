//! Entities and request/response payloads

pub mod endereco;
pub mod filme;

pub use endereco::{Cinema, Endereco};
pub use filme::{CreateFilmeDto, Filme, FilmeQuery, NewFilme, ReadFilmeDto, UpdateFilmeDto};
