//! Notification adapters
//!
//! Real delivery transports (email, SMS, in-app) are owned by the hosting
//! platform and injected behind the core `Notifier` port. This module ships
//! the in-process stand-in used for development, tests, and scheduler wiring.

pub mod tracing_notifier;

pub use tracing_notifier::TracingNotifier;
