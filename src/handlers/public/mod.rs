// handlers/public/mod.rs - Endpoints served without authentication
pub mod health;

pub use health::{health, root};
