//! # Web Handlers for the Wanderlens Marketplace Backend
//!
//! This crate provides the web handlers for the marketplace REST API.

/// Authentication and profile handlers (register, login, me, profile, passwords)
mod auth_handlers;
pub use auth_handlers::*;

/// Experience request/response types and errors
mod experience_types;
pub use experience_types::*;

/// Experience persistence layer
mod experience_service;
pub use experience_service::*;

/// Handlers for experience API endpoints
mod experience_handlers;
pub use experience_handlers::*;

/// Booking request/response types and errors
mod booking_types;
pub use booking_types::*;

/// Booking persistence layer
mod booking_service;
pub use booking_service::*;

/// Handlers for booking API endpoints
mod booking_handlers;
pub use booking_handlers::*;

/// Admin review and broadcast handlers
mod admin_handlers;
pub use admin_handlers::*;

/// Static itinerary suggestions
mod itinerary_handlers;
pub use itinerary_handlers::*;
