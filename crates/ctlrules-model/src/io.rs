//! I/O variable registry.
//!
//! Variables are identified by `(kind, number)`. The controller owns their
//! runtime readings; the editor may only rename, re-mode, or (de)activate them.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;
use tracing::debug;

use crate::config::Limits;
use crate::error::ConfigError;
use crate::kinds::{IoKind, OperationMode};

/// Reference to an I/O variable by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IoRef {
    pub kind: IoKind,
    pub number: u16,
}

impl IoRef {
    #[must_use]
    pub const fn new(kind: IoKind, number: u16) -> Self {
        Self { kind, number }
    }
}

impl Default for IoRef {
    fn default() -> Self {
        Self::new(IoKind::DigitalInput, 0)
    }
}

impl fmt::Display for IoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.number)
    }
}

impl FromStr for IoRef {
    type Err = ConfigError;

    /// Accepts `DO2`, `do:2` or `1:2` (kind code, number).
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let invalid = || {
            ConfigError::InvalidDocument(SmolStr::new(format!(
                "invalid I/O reference '{trimmed}'"
            )))
        };
        let (kind_text, number_text) = match trimmed.split_once(':') {
            Some(parts) => parts,
            None => {
                let split = trimmed
                    .find(|c: char| c.is_ascii_digit())
                    .ok_or_else(invalid)?;
                trimmed.split_at(split)
            }
        };
        let kind = IoKind::from_prefix(kind_text.trim())
            .or_else(|| kind_text.parse::<IoKind>().ok())
            .ok_or_else(invalid)?;
        let number = number_text.trim().parse::<u16>().map_err(|_| invalid())?;
        Ok(Self::new(kind, number))
    }
}

/// Readings reported by the controller. Never written by the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeReadings {
    pub state: bool,
    pub value: i32,
    pub flag: bool,
}

/// One I/O point of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoVariable {
    id: IoRef,
    name: String,
    mode: OperationMode,
    active: bool,
    runtime: RuntimeReadings,
}

impl IoVariable {
    pub(crate) fn from_parts(
        id: IoRef,
        name: String,
        mode: OperationMode,
        active: bool,
        runtime: RuntimeReadings,
    ) -> Self {
        Self {
            id,
            name,
            mode,
            active,
            runtime,
        }
    }

    #[must_use]
    pub fn id(&self) -> IoRef {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> IoKind {
        self.id.kind
    }

    #[must_use]
    pub fn number(&self) -> u16 {
        self.id.number
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn runtime(&self) -> RuntimeReadings {
        self.runtime
    }
}

/// Editable fields of an I/O variable; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct IoEdit {
    pub name: Option<String>,
    pub mode: Option<OperationMode>,
    pub active: Option<bool>,
}

/// All I/O variables of a document, in controller order.
#[derive(Debug, Clone, Default)]
pub struct IoRegistry {
    variables: Vec<IoVariable>,
}

impl IoRegistry {
    /// Build a registry, rejecting duplicate identities.
    pub fn from_variables(variables: Vec<IoVariable>) -> Result<Self, ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for variable in &variables {
            if !seen.insert(variable.id) {
                return Err(ConfigError::invalid_document(format!(
                    "duplicate I/O variable {}",
                    variable.id
                )));
            }
        }
        Ok(Self { variables })
    }

    /// Fresh registry numbering each kind from 1. Physical points start active.
    #[must_use]
    pub fn with_limits(limits: &Limits) -> Self {
        let mut variables = Vec::new();
        for kind in IoKind::ALL.iter().copied() {
            let physical = !matches!(kind, IoKind::SoftVariable | IoKind::Timer);
            for number in 1..=limits.io_count(kind) {
                let id = IoRef::new(kind, number);
                variables.push(IoVariable::from_parts(
                    id,
                    id.to_string(),
                    kind.default_mode(),
                    physical,
                    RuntimeReadings::default(),
                ));
            }
        }
        Self { variables }
    }

    #[must_use]
    pub fn get(&self, id: IoRef) -> Option<&IoVariable> {
        self.variables.iter().find(|variable| variable.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: IoRef) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IoVariable> {
        self.variables.iter()
    }

    pub fn of_kind(&self, kind: IoKind) -> impl Iterator<Item = &IoVariable> {
        self.variables.iter().filter(move |variable| variable.kind() == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Apply an edit. Runtime readings are left untouched.
    pub fn edit(&mut self, id: IoRef, edit: IoEdit) -> Result<(), ConfigError> {
        let variable = self
            .variables
            .iter_mut()
            .find(|variable| variable.id == id)
            .ok_or_else(|| ConfigError::not_found(format!("I/O variable {id}")))?;
        if let Some(mode) = edit.mode {
            if !id.kind.admits_mode(mode) {
                return Err(ConfigError::InvalidModeForKind {
                    mode,
                    kind: id.kind,
                });
            }
        }
        if let Some(name) = edit.name {
            variable.name = name.trim().to_string();
        }
        if let Some(mode) = edit.mode {
            variable.mode = mode;
        }
        if let Some(active) = edit.active {
            variable.active = active;
        }
        debug!(
            "io {id} edited name={:?} mode={} active={}",
            variable.name, variable.mode, variable.active
        );
        Ok(())
    }
}
