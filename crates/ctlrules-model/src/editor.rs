//! Group staging sessions.
//!
//! A group is assembled in a draft (members added one at a time, reordered,
//! logic chosen) and only written into its slot on commit. The draft is owned
//! by the [`Session`](crate::Session); at most one exists at a time.

use smol_str::SmolStr;
use tracing::debug;

use crate::document::ConfigDocument;
use crate::error::ConfigError;
use crate::group::{Group, GroupKind, MemberRefs, MAX_PER_GROUP};
use crate::kinds::Logic;

/// Staged state of a group being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDraft {
    kind: GroupKind,
    editing: Option<u16>,
    logic: Logic,
    staged: Vec<u16>,
}

impl GroupDraft {
    /// Open a draft for a new group, or seeded from group `existing`. Only
    /// members that are still active are carried over, in stored order.
    pub(crate) fn begin(
        document: &ConfigDocument,
        kind: GroupKind,
        existing: Option<u16>,
    ) -> Result<Self, ConfigError> {
        let Some(number) = existing else {
            return Ok(Self {
                kind,
                editing: None,
                logic: Logic::And,
                staged: Vec::new(),
            });
        };
        let group = document
            .groups(kind)
            .get(number)
            .ok_or_else(|| ConfigError::not_found(format!("{kind} {number}")))?;
        let mut staged = Vec::new();
        for member in group.refs.members() {
            if document.member_is_active(kind, member) && !staged.contains(&member) {
                staged.push(member);
            }
        }
        Ok(Self {
            kind,
            editing: Some(number),
            logic: group.logic,
            staged,
        })
    }

    #[must_use]
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Slot being edited, `None` for a new group.
    #[must_use]
    pub fn editing(&self) -> Option<u16> {
        self.editing
    }

    #[must_use]
    pub fn logic(&self) -> Logic {
        self.logic
    }

    #[must_use]
    pub fn staged(&self) -> &[u16] {
        &self.staged
    }
}

/// Result of staging a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staged {
    Added,
    AlreadyPresent,
}

/// Handle on the open draft and the document it will be committed into.
pub struct GroupEditor<'a> {
    document: &'a mut ConfigDocument,
    draft: &'a mut Option<GroupDraft>,
}

impl<'a> GroupEditor<'a> {
    pub(crate) fn new(document: &'a mut ConfigDocument, draft: &'a mut Option<GroupDraft>) -> Self {
        Self { document, draft }
    }

    /// Current draft state.
    pub fn draft(&self) -> Result<&GroupDraft, ConfigError> {
        self.draft.as_ref().ok_or(ConfigError::NoGroupSession)
    }

    fn draft_mut(&mut self) -> Result<&mut GroupDraft, ConfigError> {
        self.draft.as_mut().ok_or(ConfigError::NoGroupSession)
    }

    /// Append `member`. Staging it twice is a no-op reported as
    /// [`Staged::AlreadyPresent`].
    pub fn add_member(&mut self, member: u16) -> Result<Staged, ConfigError> {
        let draft = self.draft.as_mut().ok_or(ConfigError::NoGroupSession)?;
        if draft.staged.contains(&member) {
            debug!("{} {member} already staged", draft.kind.member_label());
            return Ok(Staged::AlreadyPresent);
        }
        if !self.document.member_is_active(draft.kind, member) {
            return Err(ConfigError::not_found(format!(
                "{} {member}",
                draft.kind.member_label()
            )));
        }
        draft.staged.push(member);
        Ok(Staged::Added)
    }

    /// Drop `member` from the draft. Absent members are ignored.
    pub fn remove_member(&mut self, member: u16) -> Result<(), ConfigError> {
        let draft = self.draft_mut()?;
        draft.staged.retain(|staged| *staged != member);
        Ok(())
    }

    /// Replace the staged order. `order` must be a permutation of the
    /// staged members.
    pub fn reorder(&mut self, order: &[u16]) -> Result<(), ConfigError> {
        let draft = self.draft_mut()?;
        let mut expected = draft.staged.clone();
        let mut requested = order.to_vec();
        expected.sort_unstable();
        requested.sort_unstable();
        if expected != requested {
            return Err(ConfigError::InvalidOrder(SmolStr::new(format!(
                "{order:?} is not a permutation of {:?}",
                draft.staged
            ))));
        }
        draft.staged = order.to_vec();
        Ok(())
    }

    pub fn set_logic(&mut self, logic: Logic) -> Result<(), ConfigError> {
        self.draft_mut()?.logic = logic;
        Ok(())
    }

    /// Write the draft into its slot, allocating one for a new group, and
    /// close the session. On error the draft stays open and the document is
    /// unchanged.
    ///
    /// The document may have been edited since members were staged, so the
    /// edited group and every staged member must still be active.
    pub fn commit(self) -> Result<u16, ConfigError> {
        let draft = self.draft.as_ref().ok_or(ConfigError::NoGroupSession)?;
        if draft.staged.is_empty() {
            return Err(ConfigError::EmptyGroup);
        }
        if draft.staged.len() > MAX_PER_GROUP {
            return Err(ConfigError::CapacityExceeded {
                table: "group members",
                capacity: MAX_PER_GROUP,
            });
        }
        let kind = draft.kind;
        if let Some(number) = draft.editing {
            if !self.document.groups(kind).is_active(number) {
                return Err(ConfigError::not_found(format!("{kind} {number}")));
            }
        }
        if let Some(stale) = draft
            .staged
            .iter()
            .find(|member| !self.document.member_is_active(kind, **member))
        {
            return Err(ConfigError::not_found(format!(
                "{} {stale}",
                kind.member_label()
            )));
        }
        let group = Group {
            logic: draft.logic,
            refs: MemberRefs::from_members(&draft.staged)?,
        };
        let table = self.document.groups_mut(kind);
        let number = match draft.editing {
            Some(number) => {
                table.activate(number, group)?;
                number
            }
            None => table.allocate(group)?,
        };
        debug!(
            "{kind} {number} committed: {} {:?}",
            group.logic,
            group.refs.members().collect::<Vec<_>>()
        );
        *self.draft = None;
        Ok(number)
    }

    /// Abandon the draft without touching the document.
    pub fn discard(self) {
        if let Some(draft) = self.draft.take() {
            debug!("{} draft discarded", draft.kind);
        }
    }
}
