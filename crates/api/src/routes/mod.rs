//! HTTP route handlers

pub mod predictions;
pub mod schema;
