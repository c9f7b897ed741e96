//! HTTP request handlers

pub mod aggregate;
pub mod resources;
