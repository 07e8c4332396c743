//! # Notification Services
//!
//! This crate provides the outbound notification layer for the marketplace
//! backend: push messages to traveler/provider devices and transactional
//! email, behind trait seams so tests can swap in mocks.

/// Email delivery trait and implementations.
pub mod email;
/// Lifecycle dispatch hooks used by the request handlers.
pub mod notifier;
/// Push delivery trait and implementations.
pub mod push;
/// Types and errors shared by the notification transports.
pub mod types;

pub use email::{EmailService, HttpEmailService, MockEmailService};
pub use notifier::Notifier;
pub use push::{ExpoPushService, MockPushService, PushService};
pub use types::{NotificationError, PushMessage};
