pub mod web;

pub use web::{router, serve, AppState};
