//! Wire types shared by the API handlers and the server binary.

pub mod api;
pub mod models;
