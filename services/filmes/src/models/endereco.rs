//! Address and cinema entities

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Street address, optionally hosting one cinema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Endereco {
    pub id: i32,
    #[validate(length(min = 1, message = "The street must not be empty"))]
    pub street: String,
    #[validate(range(min = 1, message = "The number must not be empty"))]
    pub number: i32,
    #[validate(nested)]
    pub cinema: Option<Cinema>,
}

/// Cinema located at an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Cinema {
    pub id: i32,
    #[validate(length(min = 1, message = "The cinema name is required"))]
    pub name: String,
    pub endereco_id: i32,
}
