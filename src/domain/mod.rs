//! Tool integrations over the secret registry
//!
//! Provides the business logic exposed over the MCP protocol

pub mod tools;
pub mod utils;
