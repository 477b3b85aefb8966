//! Model errors.

#![allow(missing_docs)]

use smol_str::SmolStr;
use thiserror::Error;

use crate::kinds::{ActionKind, Comparison, IoKind, OperationMode};

/// Errors raised while loading, editing, or transmitting a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Referenced slot or I/O variable is absent or inactive.
    #[error("{0} not found")]
    NotFound(SmolStr),

    /// No free slot left, or too many group members.
    #[error("{table} capacity of {capacity} exceeded")]
    CapacityExceeded { table: &'static str, capacity: usize },

    /// Action kind not permitted for the target's I/O kind.
    #[error("action '{action}' is not allowed on {target} targets")]
    InvalidActionForTarget { action: ActionKind, target: IoKind },

    /// Comparison not permitted for the target's I/O kind.
    #[error("comparison '{comparison}' is not allowed on {target} targets")]
    InvalidComparisonForTarget {
        comparison: Comparison,
        target: IoKind,
    },

    /// Operation mode not permitted for the I/O kind.
    #[error("mode '{mode}' is not allowed on {kind} variables")]
    InvalidModeForKind { mode: OperationMode, kind: IoKind },

    /// Group commit with no staged members.
    #[error("group has no members")]
    EmptyGroup,

    /// Reorder request is not a permutation of the staged members.
    #[error("invalid member order: {0}")]
    InvalidOrder(SmolStr),

    /// Group operation without an open edit session.
    #[error("no group edit session is open")]
    NoGroupSession,

    /// Malformed document or document-level invariant violation.
    #[error("invalid document: {0}")]
    InvalidDocument(SmolStr),

    /// Editor configuration error.
    #[error("invalid config '{0}'")]
    InvalidConfig(SmolStr),

    /// Network or HTTP failure talking to the controller.
    #[error("transport failure: {0}")]
    TransportFailure(SmolStr),
}

impl ConfigError {
    pub(crate) fn not_found(subject: impl std::fmt::Display) -> Self {
        Self::NotFound(SmolStr::new(subject.to_string()))
    }

    pub(crate) fn invalid_document(message: impl std::fmt::Display) -> Self {
        Self::InvalidDocument(SmolStr::new(message.to_string()))
    }
}
