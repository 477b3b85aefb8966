//! JSON shape exchanged with the controller (`GET`/`POST /config`).
//!
//! Field names are the controller's short codes. Enumerations travel as
//! positional integers.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::ConfigError;
use crate::group::MAX_PER_GROUP;
use crate::kinds::{ActionKind, Comparison, IoKind, Logic, OperationMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocumentWire {
    #[serde(default)]
    pub device_settings: IndexMap<String, Value>,
    pub io_variables: Vec<IoVariableWire>,
    pub conditions: Vec<ConditionWire>,
    pub actions: Vec<ActionWire>,
    pub condition_groups: Vec<ConditionGroupWire>,
    pub action_groups: Vec<ActionGroupWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct IoVariableWire {
    #[serde(rename = "t")]
    pub kind: IoKind,
    #[serde(rename = "n")]
    pub number: u16,
    #[serde(rename = "nm")]
    pub name: String,
    #[serde(rename = "m")]
    pub mode: OperationMode,
    #[serde(rename = "s")]
    pub active: Flag,
    #[serde(rename = "st")]
    pub state: Flag,
    #[serde(rename = "v")]
    pub value: i32,
    #[serde(rename = "f")]
    pub flag: Flag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ConditionWire {
    #[serde(rename = "cn")]
    pub number: u16,
    #[serde(rename = "t")]
    pub kind: IoKind,
    #[serde(rename = "tn")]
    pub target: u16,
    #[serde(rename = "cp")]
    pub comparison: Comparison,
    #[serde(rename = "v")]
    pub value: i32,
    #[serde(rename = "s")]
    pub active: Flag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ActionWire {
    #[serde(rename = "an")]
    pub number: u16,
    #[serde(rename = "t")]
    pub kind: IoKind,
    #[serde(rename = "tn")]
    pub target: u16,
    #[serde(rename = "a")]
    pub action: ActionKind,
    #[serde(rename = "v")]
    pub value: i32,
    #[serde(rename = "s")]
    pub active: Flag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ConditionGroupWire {
    pub n: u16,
    #[serde(rename = "l")]
    pub logic: Logic,
    #[serde(rename = "ca")]
    pub refs: Vec<u16>,
    #[serde(rename = "s")]
    pub active: Flag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ActionGroupWire {
    pub n: u16,
    #[serde(rename = "l")]
    pub logic: Logic,
    #[serde(rename = "aa")]
    pub refs: Vec<u16>,
    #[serde(rename = "s")]
    pub active: Flag,
}

/// How a boolean field is spelled on the wire. Firmware builds differ and
/// the controller gets back the spelling it sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum FlagStyle {
    #[default]
    Boolean,
    Integer,
}

/// Location of a boolean field, used to remember its spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum FlagSite {
    IoActive(IoKind, u16),
    IoState(IoKind, u16),
    IoFlag(IoKind, u16),
    Condition(u16),
    Action(u16),
    ConditionGroup(u16),
    ActionGroup(u16),
}

/// Spelling of every boolean field of a decoded document. Only fields that
/// differ from the dominant spelling are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FlagSpelling {
    dominant: FlagStyle,
    exceptions: HashMap<FlagSite, FlagStyle>,
}

impl FlagSpelling {
    pub fn capture(wire: &DocumentWire) -> Self {
        let mut sites = Vec::new();
        for v in &wire.io_variables {
            sites.push((FlagSite::IoActive(v.kind, v.number), v.active.style));
            sites.push((FlagSite::IoState(v.kind, v.number), v.state.style));
            sites.push((FlagSite::IoFlag(v.kind, v.number), v.flag.style));
        }
        sites.extend(
            wire.conditions
                .iter()
                .map(|c| (FlagSite::Condition(c.number), c.active.style)),
        );
        sites.extend(
            wire.actions
                .iter()
                .map(|a| (FlagSite::Action(a.number), a.active.style)),
        );
        sites.extend(
            wire.condition_groups
                .iter()
                .map(|g| (FlagSite::ConditionGroup(g.n), g.active.style)),
        );
        sites.extend(
            wire.action_groups
                .iter()
                .map(|g| (FlagSite::ActionGroup(g.n), g.active.style)),
        );

        let integers = sites
            .iter()
            .filter(|(_, style)| *style == FlagStyle::Integer)
            .count();
        let dominant = if integers * 2 > sites.len() {
            FlagStyle::Integer
        } else {
            FlagStyle::Boolean
        };
        let exceptions = sites
            .into_iter()
            .filter(|(_, style)| *style != dominant)
            .collect();
        Self {
            dominant,
            exceptions,
        }
    }

    pub fn flag(&self, site: FlagSite, value: bool) -> Flag {
        let style = self.exceptions.get(&site).copied().unwrap_or(self.dominant);
        Flag::new(value, style)
    }
}

/// Boolean field accepted as `true`/`false` or `0`/`1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flag {
    pub value: bool,
    pub style: FlagStyle,
}

impl Flag {
    pub fn new(value: bool, style: FlagStyle) -> Self {
        Self { value, style }
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.style {
            FlagStyle::Boolean => serializer.serialize_bool(self.value),
            FlagStyle::Integer => serializer.serialize_u8(u8::from(self.value)),
        }
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Int(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(value) => Ok(Self::new(value, FlagStyle::Boolean)),
            Raw::Int(0) => Ok(Self::new(false, FlagStyle::Integer)),
            Raw::Int(1) => Ok(Self::new(true, FlagStyle::Integer)),
            Raw::Int(other) => Err(D::Error::custom(format!(
                "expected boolean or 0/1, got {other}"
            ))),
        }
    }
}

impl DocumentWire {
    /// Document-level invariants shared by decode and encode.
    pub fn check(&self) -> Result<(), ConfigError> {
        let mut identities = HashSet::new();
        for variable in &self.io_variables {
            if !identities.insert((variable.kind, variable.number)) {
                return Err(ConfigError::invalid_document(format!(
                    "duplicate I/O variable {}{}",
                    variable.kind.prefix(),
                    variable.number
                )));
            }
        }
        check_numbers("condition", self.conditions.iter().map(|c| c.number))?;
        check_numbers("action", self.actions.iter().map(|a| a.number))?;
        check_numbers("condition group", self.condition_groups.iter().map(|g| g.n))?;
        check_numbers("action group", self.action_groups.iter().map(|g| g.n))?;
        for group in &self.condition_groups {
            check_refs("condition group", group.n, &group.refs)?;
        }
        for group in &self.action_groups {
            check_refs("action group", group.n, &group.refs)?;
        }
        Ok(())
    }
}

fn check_numbers(
    table: &str,
    numbers: impl ExactSizeIterator<Item = u16>,
) -> Result<(), ConfigError> {
    let capacity = numbers.len();
    let mut seen = HashSet::new();
    for number in numbers {
        if number == 0 || usize::from(number) > capacity {
            return Err(ConfigError::invalid_document(format!(
                "{table} slot number {number} outside 1..={capacity}"
            )));
        }
        if !seen.insert(number) {
            return Err(ConfigError::invalid_document(format!(
                "{table} slot number {number} used twice"
            )));
        }
    }
    Ok(())
}

fn check_refs(table: &str, number: u16, refs: &[u16]) -> Result<(), ConfigError> {
    if refs.len() != MAX_PER_GROUP {
        return Err(ConfigError::invalid_document(format!(
            "{table} {number} has {} references, expected {MAX_PER_GROUP}",
            refs.len()
        )));
    }
    Ok(())
}
