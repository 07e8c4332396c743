//! # Wanderlens API Client
//!
//! This crate provides a typed client for the marketplace REST API plus
//! the in-memory resource stores the client apps drive their screens
//! from. The stores take their data source by injection: production code
//! hands them the live [`client::ApiClient`], development builds and tests
//! may hand them the [`mock::MockDataProvider`] instead. There is no
//! implicit fallback from one to the other.

/// Live REST client and the `MarketplaceApi` trait.
pub mod client;
/// Canned sample data source for development builds and tests.
pub mod mock;
/// Per-resource state stores.
pub mod stores;
/// DTOs mirroring the REST API contract.
pub mod types;

pub use client::{ApiClient, ClientError, MarketplaceApi};
pub use mock::MockDataProvider;
pub use stores::{AdminStore, AuthStore, ExperienceStore, MessageKind, StoreMessage};
