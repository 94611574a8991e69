pub mod auth;
pub mod internal;
