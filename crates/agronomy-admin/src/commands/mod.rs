pub mod models;
pub mod predictions;
pub mod users;
