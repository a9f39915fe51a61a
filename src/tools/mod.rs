//! Tool implementations
//!
//! Synchronous functions over `&Database` returning `Result<_, String>`;
//! the MCP server wraps them.

pub mod clients;
pub mod measurements;
pub mod plans;
pub mod reports;
pub mod status;
pub mod validation;
