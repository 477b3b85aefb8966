mod common;

use common::{encoded, plant};
use ctlrules_model::config::Limits;
use ctlrules_model::editor::Staged;
use ctlrules_model::group::GroupKind;
use ctlrules_model::io::IoRef;
use ctlrules_model::kinds::{Comparison, IoKind, Logic};
use ctlrules_model::{ConfigDocument, ConfigError, Session};
use serde_json::json;

#[test]
fn new_group_is_committed_in_staged_order() {
    let mut session = Session::new(plant());
    let created = session
        .document_mut()
        .create_condition(IoRef::new(IoKind::DigitalInput, 2), Comparison::IsFalse, None)
        .unwrap();
    assert_eq!(created, 3);

    let mut editor = session.begin_group(GroupKind::Condition, None).unwrap();
    assert_eq!(editor.add_member(2).unwrap(), Staged::Added);
    assert_eq!(editor.add_member(3).unwrap(), Staged::Added);
    assert_eq!(editor.add_member(1).unwrap(), Staged::Added);
    editor.reorder(&[3, 1, 2]).unwrap();
    editor.set_logic(Logic::Or).unwrap();
    assert_eq!(editor.commit().unwrap(), 3);

    assert!(session.group_draft().is_none());
    assert_eq!(
        encoded(session.document())["conditionGroups"][2],
        json!({"n": 3, "l": 1, "ca": [3, 1, 2, 0, 0, 0, 0, 0, 0, 0], "s": true})
    );
}

#[test]
fn staging_twice_is_reported_not_duplicated() {
    let mut session = Session::new(plant());
    let mut editor = session.begin_group(GroupKind::Condition, None).unwrap();
    editor.add_member(1).unwrap();
    assert_eq!(editor.add_member(1).unwrap(), Staged::AlreadyPresent);
    assert_eq!(editor.draft().unwrap().staged(), &[1]);
}

#[test]
fn inactive_members_cannot_be_staged() {
    let mut session = Session::new(plant());
    let mut editor = session.begin_group(GroupKind::Condition, None).unwrap();
    assert!(matches!(editor.add_member(3), Err(ConfigError::NotFound(_))));
    assert!(matches!(editor.add_member(40), Err(ConfigError::NotFound(_))));
    assert!(editor.draft().unwrap().staged().is_empty());
}

#[test]
fn reorder_must_be_a_permutation() {
    let mut session = Session::new(plant());
    let mut editor = session.begin_group(GroupKind::Condition, None).unwrap();
    editor.add_member(1).unwrap();
    editor.add_member(2).unwrap();
    let orders: [&[u16]; 4] = [&[1], &[1, 2, 5], &[1, 1], &[2, 5]];
    for order in orders {
        assert!(
            matches!(editor.reorder(order), Err(ConfigError::InvalidOrder(_))),
            "{order:?}"
        );
    }
    assert_eq!(editor.draft().unwrap().staged(), &[1, 2]);
}

#[test]
fn empty_draft_cannot_be_committed() {
    let mut session = Session::new(plant());
    let mut editor = session.begin_group(GroupKind::Condition, Some(1)).unwrap();
    editor.remove_member(1).unwrap();
    editor.remove_member(2).unwrap();
    assert_eq!(editor.commit(), Err(ConfigError::EmptyGroup));
    assert_eq!(
        session.group_draft().map(|draft| draft.editing()),
        Some(Some(1))
    );
    assert_eq!(
        encoded(session.document())["conditionGroups"][0]["ca"],
        json!([1, 2, 0, 0, 0, 0, 0, 0, 0, 0])
    );
}

#[test]
fn eleventh_member_fails_on_commit() {
    let mut document = ConfigDocument::empty(&Limits::default());
    let target = IoRef::new(IoKind::DigitalInput, 1);
    for _ in 0..11 {
        document
            .create_condition(target, Comparison::IsTrue, None)
            .unwrap();
    }
    let mut session = Session::new(document);
    let mut editor = session.begin_group(GroupKind::Condition, None).unwrap();
    for member in 1..=11 {
        editor.add_member(member).unwrap();
    }
    assert_eq!(
        editor.commit(),
        Err(ConfigError::CapacityExceeded {
            table: "group members",
            capacity: 10
        })
    );
    assert_eq!(session.group_draft().unwrap().staged().len(), 11);
    assert!(session.document().groups(GroupKind::Condition).get(1).is_none());

    let mut editor = session.group_editor().unwrap();
    editor.remove_member(11).unwrap();
    assert_eq!(editor.commit().unwrap(), 1);
}

#[test]
fn editing_seeds_from_active_members_only() {
    let mut document = plant();
    document.delete_condition(5).unwrap();
    // Put a stale member back to simulate a document edited elsewhere.
    let mut value = encoded(&document);
    value["conditionGroups"][1]["ca"] = json!([5, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
    let document = ConfigDocument::from_json(&value.to_string()).unwrap();

    let mut session = Session::new(document);
    let editor = session.begin_group(GroupKind::Condition, Some(2)).unwrap();
    let draft = editor.draft().unwrap();
    assert_eq!(draft.staged(), &[1]);
    assert_eq!(draft.logic(), Logic::Or);
    assert_eq!(draft.editing(), Some(2));
}

#[test]
fn editing_a_free_group_is_not_found() {
    let mut session = Session::new(plant());
    assert!(matches!(
        session.begin_group(GroupKind::Condition, Some(3)),
        Err(ConfigError::NotFound(_))
    ));
    assert!(session.group_draft().is_none());
}

#[test]
fn beginning_again_discards_previous_draft() {
    let mut session = Session::new(plant());
    let mut editor = session.begin_group(GroupKind::Condition, None).unwrap();
    editor.add_member(1).unwrap();

    let editor = session.begin_group(GroupKind::Action, Some(1)).unwrap();
    let draft = editor.draft().unwrap();
    assert_eq!(draft.kind(), GroupKind::Action);
    assert_eq!(draft.staged(), &[1, 2]);
}

#[test]
fn discard_leaves_document_untouched() {
    let mut session = Session::new(plant());
    let before = encoded(session.document());
    let mut editor = session.begin_group(GroupKind::Condition, Some(1)).unwrap();
    editor.remove_member(2).unwrap();
    editor.add_member(5).unwrap();
    editor.discard();
    assert!(session.group_draft().is_none());
    assert!(session.group_editor().is_none());
    assert_eq!(encoded(session.document()), before);
}

#[test]
fn editing_rewrites_the_same_slot() {
    let mut session = Session::new(plant());
    let mut editor = session.begin_group(GroupKind::Action, Some(1)).unwrap();
    editor.reorder(&[2, 1]).unwrap();
    editor.set_logic(Logic::Or).unwrap();
    assert_eq!(editor.commit().unwrap(), 1);
    assert_eq!(
        encoded(session.document())["actionGroups"][0],
        json!({"n": 1, "l": 1, "aa": [2, 1, 0, 0, 0, 0, 0, 0, 0, 0], "s": true})
    );
}

#[test]
fn full_group_table_keeps_draft_open() {
    let mut session = Session::new(plant());
    let mut editor = session.begin_group(GroupKind::Action, None).unwrap();
    editor.add_member(1).unwrap();
    assert_eq!(editor.commit().unwrap(), 2);

    let mut editor = session.begin_group(GroupKind::Action, None).unwrap();
    editor.add_member(2).unwrap();
    assert_eq!(
        editor.commit(),
        Err(ConfigError::CapacityExceeded {
            table: "action group",
            capacity: 2
        })
    );
    assert!(session.group_draft().is_some());
}

#[test]
fn member_deleted_while_staged_blocks_commit() {
    let mut session = Session::new(plant());
    let mut editor = session.begin_group(GroupKind::Condition, None).unwrap();
    editor.add_member(5).unwrap();
    editor.add_member(2).unwrap();

    session.document_mut().delete_condition(5).unwrap();
    let before = encoded(session.document());
    let editor = session.group_editor().unwrap();
    assert!(matches!(editor.commit(), Err(ConfigError::NotFound(_))));
    assert_eq!(encoded(session.document()), before);
    assert_eq!(session.group_draft().unwrap().staged(), &[5, 2]);

    let mut editor = session.group_editor().unwrap();
    editor.remove_member(5).unwrap();
    assert_eq!(editor.commit().unwrap(), 3);
    assert_eq!(
        encoded(session.document())["conditionGroups"][2]["ca"],
        json!([2, 0, 0, 0, 0, 0, 0, 0, 0, 0])
    );
}

#[test]
fn group_deleted_while_edited_is_not_revived() {
    let mut session = Session::new(plant());
    let mut editor = session.begin_group(GroupKind::Condition, Some(1)).unwrap();
    editor.set_logic(Logic::Or).unwrap();

    session
        .document_mut()
        .delete_group(GroupKind::Condition, 1)
        .unwrap();
    let editor = session.group_editor().unwrap();
    assert!(matches!(editor.commit(), Err(ConfigError::NotFound(_))));
    assert!(session.document().groups(GroupKind::Condition).get(1).is_none());
    assert!(session.group_draft().is_some());
}
