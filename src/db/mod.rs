//! Database module
//!
//! SQLite storage for clients, measurements and plans.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
