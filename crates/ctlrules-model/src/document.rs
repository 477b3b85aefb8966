//! Configuration document: device settings, the I/O registry, and the four
//! slot tables, decoded from and assembled into the controller's JSON shape.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::config::Limits;
use crate::error::ConfigError;
use crate::group::{Group, GroupKind, MemberRefs, MAX_PER_GROUP};
use crate::io::{IoRef, IoRegistry, IoVariable, RuntimeReadings};
use crate::kinds::Logic;
use crate::rules::{Action, Condition};
use crate::slot::{Slot, SlotTable};
use crate::wire::{
    ActionGroupWire, ActionWire, ConditionGroupWire, ConditionWire, DocumentWire, FlagSite,
    FlagSpelling, IoVariableWire,
};

/// The unit fetched from and sent back to the controller.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    /// Opaque controller settings, passed through verbatim.
    pub device_settings: IndexMap<String, Value>,
    pub(crate) io: IoRegistry,
    pub(crate) conditions: SlotTable<Condition>,
    pub(crate) actions: SlotTable<Action>,
    pub(crate) condition_groups: SlotTable<Group>,
    pub(crate) action_groups: SlotTable<Group>,
    pub(crate) flags: FlagSpelling,
}

impl ConfigDocument {
    /// Fresh document with every slot free.
    #[must_use]
    pub fn empty(limits: &Limits) -> Self {
        Self {
            device_settings: IndexMap::new(),
            io: IoRegistry::with_limits(limits),
            conditions: SlotTable::new("condition", limits.conditions),
            actions: SlotTable::new("action", limits.actions),
            condition_groups: SlotTable::new("condition group", limits.condition_groups),
            action_groups: SlotTable::new("action group", limits.action_groups),
            flags: FlagSpelling::default(),
        }
    }

    /// Decode a document. Nothing is returned unless the whole document is
    /// well formed.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let wire: DocumentWire =
            serde_json::from_str(text).map_err(ConfigError::invalid_document)?;
        Self::from_wire(wire)
    }

    /// Assemble and encode the document after checking its invariants.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        let wire = self.assemble()?;
        serde_json::to_string(&wire).map_err(ConfigError::invalid_document)
    }

    /// Same as [`to_json`](Self::to_json), indented for files.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        let wire = self.assemble()?;
        serde_json::to_string_pretty(&wire).map_err(ConfigError::invalid_document)
    }

    /// Check document-level invariants without encoding.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.assemble().map(|_| ())
    }

    #[must_use]
    pub fn io(&self) -> &IoRegistry {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut IoRegistry {
        &mut self.io
    }

    #[must_use]
    pub fn conditions(&self) -> &SlotTable<Condition> {
        &self.conditions
    }

    #[must_use]
    pub fn actions(&self) -> &SlotTable<Action> {
        &self.actions
    }

    fn from_wire(wire: DocumentWire) -> Result<Self, ConfigError> {
        wire.check()?;
        let flags = FlagSpelling::capture(&wire);
        let variables = wire
            .io_variables
            .into_iter()
            .map(|raw| {
                IoVariable::from_parts(
                    IoRef::new(raw.kind, raw.number),
                    raw.name,
                    raw.mode,
                    raw.active.value,
                    RuntimeReadings {
                        state: raw.state.value,
                        value: raw.value,
                        flag: raw.flag.value,
                    },
                )
            })
            .collect();
        let conditions = wire
            .conditions
            .into_iter()
            .map(|raw| {
                let payload = Condition {
                    target: IoRef::new(raw.kind, raw.target),
                    comparison: raw.comparison,
                    value: raw.value,
                };
                slot_record(raw.number, raw.active.value, payload)
            })
            .collect();
        let actions = wire
            .actions
            .into_iter()
            .map(|raw| {
                let payload = Action {
                    target: IoRef::new(raw.kind, raw.target),
                    kind: raw.action,
                    value: raw.value,
                };
                slot_record(raw.number, raw.active.value, payload)
            })
            .collect();
        let condition_groups = wire
            .condition_groups
            .into_iter()
            .map(|raw| group_record(raw.n, raw.logic, &raw.refs, raw.active.value))
            .collect::<Result<Vec<_>, _>>()?;
        let action_groups = wire
            .action_groups
            .into_iter()
            .map(|raw| group_record(raw.n, raw.logic, &raw.refs, raw.active.value))
            .collect::<Result<Vec<_>, _>>()?;

        let document = Self {
            device_settings: wire.device_settings,
            io: IoRegistry::from_variables(variables)?,
            conditions: SlotTable::from_records("condition", conditions)?,
            actions: SlotTable::from_records("action", actions)?,
            condition_groups: SlotTable::from_records("condition group", condition_groups)?,
            action_groups: SlotTable::from_records("action group", action_groups)?,
            flags,
        };
        debug!(
            "document decoded: {} io, {}/{} conditions, {}/{} actions",
            document.io.len(),
            document.conditions.occupied_count(),
            document.conditions.capacity(),
            document.actions.occupied_count(),
            document.actions.capacity()
        );
        Ok(document)
    }

    fn assemble(&self) -> Result<DocumentWire, ConfigError> {
        let io_variables = self
            .io
            .iter()
            .map(|variable| {
                let (kind, number) = (variable.kind(), variable.number());
                let runtime = variable.runtime();
                let flags = &self.flags;
                IoVariableWire {
                    kind,
                    number,
                    name: variable.name().to_string(),
                    mode: variable.mode(),
                    active: flags.flag(FlagSite::IoActive(kind, number), variable.is_active()),
                    state: flags.flag(FlagSite::IoState(kind, number), runtime.state),
                    value: runtime.value,
                    flag: flags.flag(FlagSite::IoFlag(kind, number), runtime.flag),
                }
            })
            .collect();
        let conditions = self
            .conditions
            .records()
            .map(|(number, slot, residue)| {
                let (active, payload) = wire_payload(slot, residue);
                ConditionWire {
                    number,
                    kind: payload.target.kind,
                    target: payload.target.number,
                    comparison: payload.comparison,
                    value: payload.value,
                    active: self.flags.flag(FlagSite::Condition(number), active),
                }
            })
            .collect();
        let actions = self
            .actions
            .records()
            .map(|(number, slot, residue)| {
                let (active, payload) = wire_payload(slot, residue);
                ActionWire {
                    number,
                    kind: payload.target.kind,
                    target: payload.target.number,
                    action: payload.kind,
                    value: payload.value,
                    active: self.flags.flag(FlagSite::Action(number), active),
                }
            })
            .collect();
        let condition_groups = self
            .condition_groups
            .records()
            .map(|(n, slot, residue)| {
                let (active, group) = wire_payload(slot, residue);
                ConditionGroupWire {
                    n,
                    logic: group.logic,
                    refs: group.refs.raw().to_vec(),
                    active: self.flags.flag(FlagSite::ConditionGroup(n), active),
                }
            })
            .collect();
        let action_groups = self
            .action_groups
            .records()
            .map(|(n, slot, residue)| {
                let (active, group) = wire_payload(slot, residue);
                ActionGroupWire {
                    n,
                    logic: group.logic,
                    refs: group.refs.raw().to_vec(),
                    active: self.flags.flag(FlagSite::ActionGroup(n), active),
                }
            })
            .collect();
        let wire = DocumentWire {
            device_settings: self.device_settings.clone(),
            io_variables,
            conditions,
            actions,
            condition_groups,
            action_groups,
        };
        wire.check()?;
        Ok(wire)
    }

    /// Non-fatal findings: references and settings the controller may accept
    /// but that the editor would not have produced.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut found = Vec::new();
        for variable in self.io.iter() {
            if !variable.kind().admits_mode(variable.mode()) {
                found.push(Diagnostic::new(
                    variable.id().to_string(),
                    format!(
                        "mode '{}' is not valid for {}",
                        variable.mode(),
                        variable.kind()
                    ),
                ));
            }
        }
        for (number, condition) in self.conditions.occupied() {
            let subject = format!("C{number}");
            if !self.io.contains(condition.target) {
                found.push(Diagnostic::new(
                    &subject,
                    format!("target {} does not exist", condition.target),
                ));
            }
            if !condition.target.kind.admits_comparison(condition.comparison) {
                found.push(Diagnostic::new(
                    &subject,
                    format!(
                        "comparison '{}' is not valid for {}",
                        condition.comparison, condition.target.kind
                    ),
                ));
            }
        }
        for (number, action) in self.actions.occupied() {
            let subject = format!("A{number}");
            if !self.io.contains(action.target) {
                found.push(Diagnostic::new(
                    &subject,
                    format!("target {} does not exist", action.target),
                ));
            }
            if !action.target.kind.admits_action(action.kind) {
                found.push(Diagnostic::new(
                    &subject,
                    format!(
                        "action '{}' is not valid for {}",
                        action.kind, action.target.kind
                    ),
                ));
            }
        }
        for kind in [GroupKind::Condition, GroupKind::Action] {
            for (number, group) in self.groups(kind).occupied() {
                let subject = format!("{}{number}", kind.prefix());
                if group.refs.is_empty() {
                    found.push(Diagnostic::new(&subject, "active but has no members"));
                }
                if group.refs.has_holes() {
                    found.push(Diagnostic::new(&subject, "references contain gaps"));
                }
                for member in group.refs.members() {
                    if !self.member_is_active(kind, member) {
                        found.push(Diagnostic::new(
                            &subject,
                            format!("member {member} is not an active {}", kind.member_label()),
                        ));
                    }
                }
            }
        }
        found
    }
}

/// A finding reported by [`ConfigDocument::diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Entity the finding is about, e.g. `C3` or `DO1`.
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

fn slot_record<T: Default + PartialEq>(
    number: u16,
    active: bool,
    payload: T,
) -> (u16, Slot<T>, Option<T>) {
    if active {
        (number, Slot::Occupied(payload), None)
    } else if payload == T::default() {
        (number, Slot::Free, None)
    } else {
        (number, Slot::Free, Some(payload))
    }
}

fn group_record(
    number: u16,
    logic: Logic,
    refs: &[u16],
    active: bool,
) -> Result<(u16, Slot<Group>, Option<Group>), ConfigError> {
    let raw: [u16; MAX_PER_GROUP] = refs.try_into().map_err(|_| {
        ConfigError::invalid_document(format!(
            "group {number} has {} references, expected {MAX_PER_GROUP}",
            refs.len()
        ))
    })?;
    let group = Group {
        logic,
        refs: MemberRefs::from_raw(raw),
    };
    Ok(slot_record(number, active, group))
}

fn wire_payload<T: Default + Copy>(slot: &Slot<T>, residue: Option<&T>) -> (bool, T) {
    match slot {
        Slot::Occupied(payload) => (true, *payload),
        Slot::Free => (false, residue.copied().unwrap_or_default()),
    }
}
