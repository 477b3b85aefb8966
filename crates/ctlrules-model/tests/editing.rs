mod common;

use common::{encoded, plant};
use ctlrules_model::config::Limits;
use ctlrules_model::group::GroupKind;
use ctlrules_model::io::{IoEdit, IoRef};
use ctlrules_model::kinds::{ActionKind, Comparison, IoKind, OperationMode};
use ctlrules_model::rules::{Action, Condition};
use ctlrules_model::{ConfigDocument, ConfigError, Session};
use serde_json::json;

const DI1: IoRef = IoRef::new(IoKind::DigitalInput, 1);
const DO1: IoRef = IoRef::new(IoKind::DigitalOutput, 1);
const AI1: IoRef = IoRef::new(IoKind::AnalogInput, 1);
const SV1: IoRef = IoRef::new(IoKind::SoftVariable, 1);
const TM1: IoRef = IoRef::new(IoKind::Timer, 1);

fn refs(document: &ConfigDocument, kind: GroupKind, number: u16) -> Vec<u16> {
    document
        .groups(kind)
        .get(number)
        .expect("group is active")
        .refs
        .raw()
        .to_vec()
}

#[test]
fn create_condition_fills_lowest_free_slot() {
    let mut document = plant();
    let first = document
        .create_condition(AI1, Comparison::IsLess, Some(100))
        .unwrap();
    let second = document
        .create_condition(TM1, Comparison::IsTrue, Some(7))
        .unwrap();
    assert_eq!((first, second), (3, 4));
    assert_eq!(
        document.conditions().get(3),
        Some(&Condition {
            target: AI1,
            comparison: Comparison::IsLess,
            value: 100
        })
    );
    assert_eq!(document.conditions().get(4).unwrap().value, 0);
}

#[test]
fn condition_comparison_must_suit_target() {
    let mut document = plant();
    let err = document
        .create_condition(DI1, Comparison::IsGreater, Some(3))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidComparisonForTarget {
            comparison: Comparison::IsGreater,
            target: IoKind::DigitalInput
        }
    );
    assert_eq!(document.conditions().occupied_count(), 3);
}

#[test]
fn condition_target_must_exist() {
    let mut document = plant();
    let err = document
        .create_condition(IoRef::new(IoKind::DigitalInput, 40), Comparison::IsTrue, None)
        .unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn full_condition_table_is_left_unchanged() {
    let mut document = plant();
    for _ in 0..3 {
        document
            .create_condition(SV1, Comparison::FlagIsTrue, None)
            .unwrap();
    }
    let before = encoded(&document);
    let err = document
        .create_condition(SV1, Comparison::IsFalse, None)
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::CapacityExceeded {
            table: "condition",
            capacity: 6
        }
    );
    assert_eq!(encoded(&document), before);
}

#[test]
fn update_condition_requires_active_slot() {
    let mut document = plant();
    document
        .update_condition(2, AI1, Comparison::IsEqual, Some(42))
        .unwrap();
    assert_eq!(document.conditions().get(2).unwrap().value, 42);

    let err = document
        .update_condition(4, DI1, Comparison::IsTrue, None)
        .unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
    let err = document
        .update_condition(99, DI1, Comparison::IsTrue, None)
        .unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn rejected_update_keeps_previous_condition() {
    let mut document = plant();
    let before = *document.conditions().get(1).unwrap();
    let err = document
        .update_condition(1, AI1, Comparison::IsTrue, None)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidComparisonForTarget { .. }
    ));
    assert_eq!(document.conditions().get(1), Some(&before));
}

#[test]
fn deleting_condition_compacts_group_membership() {
    let mut document = plant();
    let touched = document.delete_condition(5).unwrap();
    assert_eq!(touched, 1);
    assert!(!document.conditions().is_active(5));
    assert_eq!(
        refs(&document, GroupKind::Condition, 2),
        vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(
        refs(&document, GroupKind::Condition, 1),
        vec![1, 2, 0, 0, 0, 0, 0, 0, 0, 0]
    );
}

#[test]
fn deleted_member_is_compacted_out_of_the_middle() {
    let mut document = ConfigDocument::empty(&Limits::default());
    for _ in 0..7 {
        document
            .create_condition(SV1, Comparison::IsGreater, Some(1))
            .unwrap();
    }
    let mut session = Session::new(document);
    let mut editor = session.begin_group(GroupKind::Condition, None).unwrap();
    for member in [2, 5, 7] {
        editor.add_member(member).unwrap();
    }
    editor.commit().unwrap();
    let mut editor = session.begin_group(GroupKind::Condition, None).unwrap();
    editor.add_member(5).unwrap();
    editor.add_member(7).unwrap();
    assert_eq!(editor.commit().unwrap(), 2);

    let mut document = session.into_document();
    assert_eq!(document.delete_condition(5).unwrap(), 2);
    assert_eq!(
        refs(&document, GroupKind::Condition, 1),
        vec![2, 7, 0, 0, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(
        refs(&document, GroupKind::Condition, 2),
        vec![7, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    );
}

#[test]
fn deleting_shared_condition_touches_every_group() {
    let mut document = plant();
    assert_eq!(document.delete_condition(1).unwrap(), 2);
    assert_eq!(
        refs(&document, GroupKind::Condition, 1),
        vec![2, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(
        refs(&document, GroupKind::Condition, 2),
        vec![5, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    );
    let out = encoded(&document);
    assert_eq!(
        out["conditions"][0],
        json!({"cn": 1, "t": 0, "tn": 0, "cp": 0, "v": 0, "s": false})
    );
}

#[test]
fn deleting_free_condition_is_not_found() {
    let mut document = plant();
    assert!(matches!(
        document.delete_condition(4),
        Err(ConfigError::NotFound(_))
    ));
}

#[test]
fn input_targets_only_take_flag_actions() {
    let mut document = plant();
    let err = document
        .create_action(DI1, ActionKind::SetValue, Some(5))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidActionForTarget {
            action: ActionKind::SetValue,
            target: IoKind::DigitalInput
        }
    );
    let number = document.create_action(DI1, ActionKind::SetFlag, None).unwrap();
    assert_eq!(number, 3);
    assert_eq!(
        document.actions().get(3),
        Some(&Action {
            target: DI1,
            kind: ActionKind::SetFlag,
            value: 0
        })
    );
}

#[test]
fn action_legality_follows_target_kind() {
    let mut document = ConfigDocument::empty(&Limits::default());
    assert!(document.create_action(DO1, ActionKind::Reset, None).is_ok());
    assert!(document.create_action(DO1, ActionKind::Increment, Some(1)).is_err());
    assert!(document.create_action(TM1, ActionKind::SetValue, Some(30)).is_ok());
    assert!(document.create_action(TM1, ActionKind::SetFlag, None).is_err());
    assert!(document.create_action(SV1, ActionKind::Decrement, Some(2)).is_ok());
    assert!(document.create_action(AI1, ActionKind::Clear, None).is_ok());
    assert_eq!(document.actions().occupied_count(), 4);
}

#[test]
fn update_action_revalidates_kind() {
    let mut document = plant();
    document
        .update_action(2, SV1, ActionKind::SetValue, Some(10))
        .unwrap();
    assert_eq!(document.actions().get(2).unwrap().value, 10);
    let err = document
        .update_action(1, DO1, ActionKind::Decrement, Some(1))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidActionForTarget { .. }));
    assert_eq!(document.actions().get(1).unwrap().kind, ActionKind::Set);
}

#[test]
fn deleting_action_compacts_action_groups() {
    let mut document = plant();
    assert_eq!(document.delete_action(1).unwrap(), 1);
    assert_eq!(
        refs(&document, GroupKind::Action, 1),
        vec![2, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    );
}

#[test]
fn deleting_group_resets_slot() {
    let mut document = plant();
    document.delete_group(GroupKind::Condition, 2).unwrap();
    assert!(document.groups(GroupKind::Condition).get(2).is_none());
    assert_eq!(
        encoded(&document)["conditionGroups"][1],
        json!({"n": 2, "l": 0, "ca": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0], "s": false})
    );
    assert!(matches!(
        document.delete_group(GroupKind::Condition, 2),
        Err(ConfigError::NotFound(_))
    ));
}

#[test]
fn io_edits_never_touch_runtime_fields() {
    let mut document = plant();
    document
        .io_mut()
        .edit(
            DO1,
            IoEdit {
                name: Some("main pump".into()),
                mode: Some(OperationMode::StartDelay),
                active: Some(false),
            },
        )
        .unwrap();
    let out = encoded(&document);
    assert_eq!(
        out["ioVariables"][2],
        json!({"t": 1, "n": 1, "nm": "main pump", "m": 1, "s": false, "st": false, "v": 0, "f": true})
    );

    let err = document
        .io_mut()
        .edit(
            SV1,
            IoEdit {
                mode: Some(OperationMode::Repeating),
                ..IoEdit::default()
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidModeForKind {
            mode: OperationMode::Repeating,
            kind: IoKind::SoftVariable
        }
    );
}
