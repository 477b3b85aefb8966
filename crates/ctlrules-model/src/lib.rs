//! `ctlrules-model` - rule configuration model for I/O automation controllers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// Editor configuration file (`ctlrules.toml`).
pub mod config;
/// Configuration document aggregate and its consistency checks.
pub mod document;
/// Group staging sessions.
pub mod editor;
/// Model errors.
pub mod error;
/// Condition and action groups.
pub mod group;
/// I/O variable registry.
pub mod io;
/// Enumerations and their wire codes.
pub mod kinds;
/// Condition and action tables.
pub mod rules;
/// Editing session owning a loaded document.
pub mod session;
/// Fixed-capacity slot tables.
pub mod slot;
/// Plain-text rendering of a document.
pub mod summary;
/// Controller transport.
pub mod transport;
mod wire;

pub use document::ConfigDocument;
pub use error::ConfigError;
pub use session::Session;
pub use transport::{ConfigTransport, HttpTransport, SaveOutcome};
