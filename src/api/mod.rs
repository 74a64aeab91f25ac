//! HTTP API module - routes and driver handlers

pub mod drivers;
pub mod routes;
