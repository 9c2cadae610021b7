//! Core types for the callme lead notifier.
//!
//! - **Configuration** (`config`) - file, environment, and override layering
//! - **Domain** (`domain`) - leads, agent pool, outbound notifications
//! - **Errors** (`errors`) - validation and delivery failures with user-safe messages
//! - **Notifier** (`notify`) - the seam the SMS provider client plugs into

pub mod config;
pub mod domain;
pub mod errors;
pub mod notify;

pub use domain::agent::{AgentPool, AgentPoolError};
pub use domain::lead::{Lead, LeadForm};
pub use domain::notification::Notification;
pub use errors::{CallbackError, NotificationError, ValidationError};
pub use notify::Notifier;
