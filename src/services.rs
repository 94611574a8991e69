pub mod auth;
pub mod intent;
pub mod mcp;
