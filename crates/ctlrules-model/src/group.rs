//! Condition and action groups.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::document::ConfigDocument;
use crate::error::ConfigError;
use crate::kinds::Logic;
use crate::slot::SlotTable;

/// Member capacity of every group.
pub const MAX_PER_GROUP: usize = 10;

/// Which group table, and therefore which member table, is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Condition,
    Action,
}

impl GroupKind {
    /// Name of the member entity, e.g. `condition`.
    #[must_use]
    pub fn member_label(self) -> &'static str {
        match self {
            Self::Condition => "condition",
            Self::Action => "action",
        }
    }

    /// Short prefix used when listing groups.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Condition => "CG",
            Self::Action => "AG",
        }
    }

    /// Prefix of a member reference, e.g. the `C` of `C3`.
    #[must_use]
    pub fn member_prefix(self) -> &'static str {
        match self {
            Self::Condition => "C",
            Self::Action => "A",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} group", self.member_label())
    }
}

impl FromStr for GroupKind {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "condition" | "conditions" | "cg" => Ok(Self::Condition),
            "action" | "actions" | "ag" => Ok(Self::Action),
            other => Err(ConfigError::not_found(format!("group kind '{other}'"))),
        }
    }
}

/// Fixed-length member array. Unused positions hold `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberRefs([u16; MAX_PER_GROUP]);

impl MemberRefs {
    /// Pack members in order, padding with `0`.
    pub fn from_members(members: &[u16]) -> Result<Self, ConfigError> {
        if members.len() > MAX_PER_GROUP {
            return Err(ConfigError::CapacityExceeded {
                table: "group members",
                capacity: MAX_PER_GROUP,
            });
        }
        let mut refs = [0; MAX_PER_GROUP];
        refs[..members.len()].copy_from_slice(members);
        Ok(Self(refs))
    }

    /// Raw array as stored on the controller, holes included.
    pub(crate) fn from_raw(refs: [u16; MAX_PER_GROUP]) -> Self {
        Self(refs)
    }

    #[must_use]
    pub fn raw(&self) -> &[u16; MAX_PER_GROUP] {
        &self.0
    }

    /// Non-sentinel members in stored order.
    pub fn members(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied().filter(|member| *member != 0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members().count()
    }

    /// Listed as empty when the first position is the sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    #[must_use]
    pub fn contains(&self, member: u16) -> bool {
        member != 0 && self.0.contains(&member)
    }

    /// Drop every occurrence of `member` and compact the rest to the front.
    pub fn remove(&mut self, member: u16) -> bool {
        if !self.contains(member) {
            return false;
        }
        let mut compacted = [0; MAX_PER_GROUP];
        for (slot, kept) in compacted
            .iter_mut()
            .zip(self.members().filter(|candidate| *candidate != member))
        {
            *slot = kept;
        }
        self.0 = compacted;
        true
    }

    /// Whether a non-zero entry follows a sentinel.
    #[must_use]
    pub fn has_holes(&self) -> bool {
        self.0
            .iter()
            .skip_while(|member| **member != 0)
            .any(|member| *member != 0)
    }
}

/// Payload of an occupied group slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Group {
    pub logic: Logic,
    pub refs: MemberRefs,
}

impl Group {
    /// Whether list views show this group. Mirrors the controller UI, which
    /// treats a group whose first reference is `0` as absent.
    #[must_use]
    pub fn is_listed(&self) -> bool {
        !self.refs.is_empty()
    }
}

impl ConfigDocument {
    #[must_use]
    pub fn groups(&self, kind: GroupKind) -> &SlotTable<Group> {
        match kind {
            GroupKind::Condition => &self.condition_groups,
            GroupKind::Action => &self.action_groups,
        }
    }

    pub(crate) fn groups_mut(&mut self, kind: GroupKind) -> &mut SlotTable<Group> {
        match kind {
            GroupKind::Condition => &mut self.condition_groups,
            GroupKind::Action => &mut self.action_groups,
        }
    }

    /// Whether `member` names an active entry of the table `kind` groups over.
    #[must_use]
    pub fn member_is_active(&self, kind: GroupKind, member: u16) -> bool {
        match kind {
            GroupKind::Condition => self.conditions.is_active(member),
            GroupKind::Action => self.actions.is_active(member),
        }
    }

    /// Groups listed in views: occupied and not starting with the sentinel.
    pub fn listed_groups(&self, kind: GroupKind) -> impl Iterator<Item = (u16, &Group)> {
        self.groups(kind)
            .occupied()
            .filter(|(_, group)| group.is_listed())
    }

    /// Free group `number`. Its references are zeroed and logic reset to AND.
    pub fn delete_group(&mut self, kind: GroupKind, number: u16) -> Result<(), ConfigError> {
        let table = self.groups_mut(kind);
        if !table.is_active(number) {
            return Err(ConfigError::not_found(format!("{kind} {number}")));
        }
        table.release(number)?;
        debug!("{kind} {number} deleted");
        Ok(())
    }
}
