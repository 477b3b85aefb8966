//! Condition and action tables and their editing operations.

#![allow(missing_docs)]

use tracing::debug;

use crate::document::ConfigDocument;
use crate::error::ConfigError;
use crate::io::IoRef;
use crate::kinds::{ActionKind, Comparison};

/// Test applied to one I/O variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub target: IoRef,
    pub comparison: Comparison,
    pub value: i32,
}

impl Condition {
    /// `value` is kept only for value-bearing comparisons (default 0) and is
    /// zero otherwise.
    #[must_use]
    pub fn new(target: IoRef, comparison: Comparison, value: Option<i32>) -> Self {
        let value = if comparison.takes_value() {
            value.unwrap_or(0)
        } else {
            0
        };
        Self {
            target,
            comparison,
            value,
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::new(IoRef::default(), Comparison::IsTrue, None)
    }
}

/// Operation applied to one I/O variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub target: IoRef,
    pub kind: ActionKind,
    pub value: i32,
}

impl Action {
    /// Same value normalisation as [`Condition::new`].
    #[must_use]
    pub fn new(target: IoRef, kind: ActionKind, value: Option<i32>) -> Self {
        let value = if kind.takes_value() {
            value.unwrap_or(0)
        } else {
            0
        };
        Self {
            target,
            kind,
            value,
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::new(IoRef::default(), ActionKind::Set, None)
    }
}

impl ConfigDocument {
    /// Store a new condition in the lowest free slot.
    pub fn create_condition(
        &mut self,
        target: IoRef,
        comparison: Comparison,
        value: Option<i32>,
    ) -> Result<u16, ConfigError> {
        let condition = self.checked_condition(target, comparison, value)?;
        let number = self.conditions.allocate(condition)?;
        debug!("condition {number} created: {target} {comparison}");
        Ok(number)
    }

    /// Rewrite the active condition `number`.
    pub fn update_condition(
        &mut self,
        number: u16,
        target: IoRef,
        comparison: Comparison,
        value: Option<i32>,
    ) -> Result<(), ConfigError> {
        if !self.conditions.is_active(number) {
            return Err(ConfigError::not_found(format!("condition {number}")));
        }
        let condition = self.checked_condition(target, comparison, value)?;
        self.conditions.activate(number, condition)?;
        debug!("condition {number} updated: {target} {comparison}");
        Ok(())
    }

    /// Free condition `number` and drop it from every condition group.
    /// Returns how many groups lost the member.
    pub fn delete_condition(&mut self, number: u16) -> Result<usize, ConfigError> {
        if !self.conditions.is_active(number) {
            return Err(ConfigError::not_found(format!("condition {number}")));
        }
        self.conditions.release(number)?;
        let mut touched = 0;
        for (group, payload) in self.condition_groups.occupied_mut() {
            if payload.refs.remove(number) {
                debug!("condition {number} removed from condition group {group}");
                touched += 1;
            }
        }
        debug!("condition {number} deleted");
        Ok(touched)
    }

    /// Store a new action in the lowest free slot.
    pub fn create_action(
        &mut self,
        target: IoRef,
        kind: ActionKind,
        value: Option<i32>,
    ) -> Result<u16, ConfigError> {
        let action = self.checked_action(target, kind, value)?;
        let number = self.actions.allocate(action)?;
        debug!("action {number} created: {target} {kind}");
        Ok(number)
    }

    /// Rewrite the active action `number`.
    pub fn update_action(
        &mut self,
        number: u16,
        target: IoRef,
        kind: ActionKind,
        value: Option<i32>,
    ) -> Result<(), ConfigError> {
        if !self.actions.is_active(number) {
            return Err(ConfigError::not_found(format!("action {number}")));
        }
        let action = self.checked_action(target, kind, value)?;
        self.actions.activate(number, action)?;
        debug!("action {number} updated: {target} {kind}");
        Ok(())
    }

    /// Free action `number` and drop it from every action group.
    pub fn delete_action(&mut self, number: u16) -> Result<usize, ConfigError> {
        if !self.actions.is_active(number) {
            return Err(ConfigError::not_found(format!("action {number}")));
        }
        self.actions.release(number)?;
        let mut touched = 0;
        for (group, payload) in self.action_groups.occupied_mut() {
            if payload.refs.remove(number) {
                debug!("action {number} removed from action group {group}");
                touched += 1;
            }
        }
        debug!("action {number} deleted");
        Ok(touched)
    }

    fn checked_condition(
        &self,
        target: IoRef,
        comparison: Comparison,
        value: Option<i32>,
    ) -> Result<Condition, ConfigError> {
        if !self.io.contains(target) {
            return Err(ConfigError::not_found(format!("I/O variable {target}")));
        }
        if !target.kind.admits_comparison(comparison) {
            return Err(ConfigError::InvalidComparisonForTarget {
                comparison,
                target: target.kind,
            });
        }
        Ok(Condition::new(target, comparison, value))
    }

    fn checked_action(
        &self,
        target: IoRef,
        kind: ActionKind,
        value: Option<i32>,
    ) -> Result<Action, ConfigError> {
        if !self.io.contains(target) {
            return Err(ConfigError::not_found(format!("I/O variable {target}")));
        }
        if !target.kind.admits_action(kind) {
            return Err(ConfigError::InvalidActionForTarget {
                action: kind,
                target: target.kind,
            });
        }
        Ok(Action::new(target, kind, value))
    }
}
