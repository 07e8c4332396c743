//! # Auth Services
//!
//! This crate provides authentication services for the marketplace backend.
//! It includes JWT token handling, middleware for request authentication,
//! role-checked extractors, and the user service.

/// JWT token handling.
pub mod jwt;
/// Middleware for request authentication and role-checked extractors.
pub mod middleware;
/// Service definitions for user management and authentication operations.
pub mod service;
/// Types and structures used in authentication services.
pub mod types;
