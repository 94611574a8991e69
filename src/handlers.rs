pub mod auth;
pub mod contacts;
pub mod dashboard;
pub mod internal;
pub mod pipeline_stages;
pub mod properties;
pub mod tags;
pub mod tasks;
pub mod tenancy;
pub mod users;
pub mod webhook;
