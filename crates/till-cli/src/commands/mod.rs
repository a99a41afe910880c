//! CLI command implementations

pub mod capabilities;
pub mod common;
pub mod config;
pub mod route;
pub mod routes;
