//! MessageBird integration - outbound SMS for lead notifications
//!
//! Wraps the MessageBird REST API (`POST /messages`) and exposes it through
//! the core `Notifier` trait. Every provider failure, whether transport,
//! authentication, or a rejected payload, reaches the caller as a single
//! `NotificationError`; the detail only goes to the logs.
//!
//! # Configuration
//!
//! Set `CALLME_MESSAGEBIRD_API_KEY` (or `MESSAGEBIRD_API_KEY`) and
//! `CALLME_MESSAGEBIRD_ORIGINATOR`. The base URL is overridable for tests.

pub mod client;

pub use client::{CreateMessage, MessageBirdClient, MessageBirdError, MessageResponse};
