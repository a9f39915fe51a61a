//! GS Coach Library
//!
//! Energy and macro planning for a nutrition/fitness coach, with client
//! records in SQLite, PDF client sheets and an MCP server front end.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod planner;
pub mod tools;
