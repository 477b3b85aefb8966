//! Editing commands. Each loads the document file, applies one edit through a
//! session and writes the file back only if the edit succeeded.

use std::path::Path;

use ctlrules_model::editor::{GroupEditor, Staged};
use ctlrules_model::group::GroupKind;
use ctlrules_model::io::IoEdit;
use ctlrules_model::Session;

use crate::cli::{ActionAction, ConditionAction, GroupAction, IoAction};
use crate::style;
use crate::{read_document, write_document};

fn with_session(
    path: &Path,
    apply: impl FnOnce(&mut Session) -> anyhow::Result<String>,
) -> anyhow::Result<()> {
    let mut session = Session::new(read_document(path)?);
    let message = apply(&mut session)?;
    write_document(path, session.document())?;
    println!("{}", style::success(message));
    Ok(())
}

pub fn io(action: IoAction) -> anyhow::Result<()> {
    match action {
        IoAction::Set {
            doc,
            target,
            name,
            mode,
            active,
            inactive,
        } => with_session(&doc.file, |session| {
            let active = match (active, inactive) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            session
                .document_mut()
                .io_mut()
                .edit(target, IoEdit { name, mode, active })?;
            Ok(format!("{target} updated"))
        }),
    }
}

pub fn condition(action: ConditionAction) -> anyhow::Result<()> {
    match action {
        ConditionAction::Add {
            doc,
            target,
            comparison,
            value,
        } => with_session(&doc.file, |session| {
            let number = session
                .document_mut()
                .create_condition(target, comparison, value)?;
            Ok(format!("Condition C{number} created"))
        }),
        ConditionAction::Update {
            doc,
            number,
            target,
            comparison,
            value,
        } => with_session(&doc.file, |session| {
            session
                .document_mut()
                .update_condition(number, target, comparison, value)?;
            Ok(format!("Condition C{number} updated"))
        }),
        ConditionAction::Delete { doc, number } => with_session(&doc.file, |session| {
            let groups = session.document_mut().delete_condition(number)?;
            Ok(format!(
                "Condition C{number} deleted ({groups} group(s) updated)"
            ))
        }),
    }
}

pub fn action(action: ActionAction) -> anyhow::Result<()> {
    match action {
        ActionAction::Add {
            doc,
            target,
            kind,
            value,
        } => with_session(&doc.file, |session| {
            let number = session.document_mut().create_action(target, kind, value)?;
            Ok(format!("Action A{number} created"))
        }),
        ActionAction::Update {
            doc,
            number,
            target,
            kind,
            value,
        } => with_session(&doc.file, |session| {
            session
                .document_mut()
                .update_action(number, target, kind, value)?;
            Ok(format!("Action A{number} updated"))
        }),
        ActionAction::Delete { doc, number } => with_session(&doc.file, |session| {
            let groups = session.document_mut().delete_action(number)?;
            Ok(format!("Action A{number} deleted ({groups} group(s) updated)"))
        }),
    }
}

pub fn group(action: GroupAction) -> anyhow::Result<()> {
    match action {
        GroupAction::Set {
            doc,
            kind,
            number,
            members,
            add,
            remove,
            logic,
        } => with_session(&doc.file, |session| {
            let mut editor = session.begin_group(kind, number)?;
            if let Some(members) = members {
                let staged = editor.draft()?.staged().to_vec();
                for member in staged {
                    editor.remove_member(member)?;
                }
                for member in members {
                    stage(&mut editor, kind, member)?;
                }
            }
            for member in add {
                stage(&mut editor, kind, member)?;
            }
            for member in remove {
                editor.remove_member(member)?;
            }
            if let Some(logic) = logic {
                editor.set_logic(logic)?;
            }
            let draft = editor.draft()?;
            let listing = draft
                .staged()
                .iter()
                .map(|member| format!("{}{member}", kind.member_prefix()))
                .collect::<Vec<_>>()
                .join(", ");
            let logic = draft.logic().label().to_ascii_uppercase();
            let number = editor.commit()?;
            Ok(format!(
                "{}{number} saved: {logic} [{listing}]",
                kind.prefix()
            ))
        }),
        GroupAction::Delete { doc, kind, number } => with_session(&doc.file, |session| {
            session.document_mut().delete_group(kind, number)?;
            Ok(format!("{}{number} deleted", kind.prefix()))
        }),
    }
}

fn stage(
    editor: &mut GroupEditor<'_>,
    kind: GroupKind,
    member: u16,
) -> anyhow::Result<()> {
    if editor.add_member(member)? == Staged::AlreadyPresent {
        println!(
            "{}",
            style::warning(format!(
                "{}{member} is already in the group",
                kind.member_prefix()
            ))
        );
    }
    Ok(())
}
