//! HTTP API handlers

pub mod health;
pub mod ingest;
pub mod latest;
