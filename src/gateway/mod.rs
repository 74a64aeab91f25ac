//! Gateway module - Circuit breaking and downstream status queries

pub mod circuit_breaker;
pub mod zombie;
