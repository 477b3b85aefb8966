//! Editing session owning a loaded document.
//!
//! A session is created from a successful fetch (or a local document), is
//! the only place the document is mutated, and is dropped once a save has
//! been accepted. The controller then restarts and the next load starts a
//! fresh session.

use tracing::{info, warn};

use crate::document::ConfigDocument;
use crate::editor::{GroupDraft, GroupEditor};
use crate::error::ConfigError;
use crate::group::GroupKind;
use crate::transport::{ConfigTransport, SaveOutcome};

/// Owner of the document between load and save.
pub struct Session {
    document: ConfigDocument,
    group_draft: Option<GroupDraft>,
}

impl Session {
    #[must_use]
    pub fn new(document: ConfigDocument) -> Self {
        Self {
            document,
            group_draft: None,
        }
    }

    /// Fetch and decode the controller's document. Any failure yields no
    /// session at all.
    pub fn load(transport: &dyn ConfigTransport) -> Result<Self, ConfigError> {
        let body = transport.fetch()?;
        let document = ConfigDocument::from_json(&body)?;
        info!(
            "configuration loaded from {} ({} conditions, {} actions active)",
            transport.endpoint(),
            document.conditions().occupied_count(),
            document.actions().occupied_count()
        );
        Ok(Self::new(document))
    }

    /// Validate, encode and submit the document. On failure the session is
    /// left as it was so the save can be retried.
    pub fn save(&self, transport: &dyn ConfigTransport) -> Result<SaveOutcome, ConfigError> {
        if let Some(draft) = &self.group_draft {
            warn!(
                "saving with an uncommitted {} draft; it is not part of the upload",
                draft.kind()
            );
        }
        let body = self.document.to_json()?;
        let outcome = transport.submit(&body)?;
        match outcome {
            SaveOutcome::Confirmed => info!("configuration accepted by {}", transport.endpoint()),
            SaveOutcome::Presumed => info!(
                "no reply from {} within the save window; assuming the controller is restarting",
                transport.endpoint()
            ),
        }
        Ok(outcome)
    }

    #[must_use]
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut ConfigDocument {
        &mut self.document
    }

    #[must_use]
    pub fn into_document(self) -> ConfigDocument {
        self.document
    }

    /// Open a group draft, discarding any draft already open.
    pub fn begin_group(
        &mut self,
        kind: GroupKind,
        existing: Option<u16>,
    ) -> Result<GroupEditor<'_>, ConfigError> {
        if let Some(previous) = self.group_draft.take() {
            warn!(
                "discarding open {} draft to start a new one",
                previous.kind()
            );
        }
        self.group_draft = Some(GroupDraft::begin(&self.document, kind, existing)?);
        Ok(GroupEditor::new(&mut self.document, &mut self.group_draft))
    }

    /// Resume the open draft, if any.
    pub fn group_editor(&mut self) -> Option<GroupEditor<'_>> {
        if self.group_draft.is_none() {
            return None;
        }
        Some(GroupEditor::new(&mut self.document, &mut self.group_draft))
    }

    #[must_use]
    pub fn group_draft(&self) -> Option<&GroupDraft> {
        self.group_draft.as_ref()
    }
}
