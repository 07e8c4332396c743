//! # Postgres
//!
//! This crate provides a client for the Wanderlens marketplace backend to interact with a PostgreSQL database.

/// Database connection, connectivity test, and schema bootstrap.
pub mod database;
