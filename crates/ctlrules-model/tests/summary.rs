mod common;

use common::plant;
use ctlrules_model::summary;
use expect_test::expect;

#[test]
fn renders_active_entries() {
    let actual = summary::render(&plant());
    expect![[r#"
        I/O variables: 6
          digitalInput:
            DI1   start            none
            DI2   stop             none
          digitalOutput:
            DO1   pump             autoOff
          analogInput:
            AI1   level            none
          softVariable:
            SV1   count            none
          timer:
            TM1   delay            oneShot (inactive)
        Conditions: 3/6
          C1   DI1 isTrue
          C2   AI1 isGreater 600
          C5   SV1 isEqual 3
        Actions: 2/4
          A1   DO1 set
          A2   SV1 increment 1
        Condition groups: 2/3
          CG1  AND [C1, C2]
          CG2  OR [C5, C1]
        Action groups: 1/2
          AG1  AND [A1, A2]
    "#]]
    .assert_eq(&actual);
}

#[test]
fn groups_emptied_by_deletion_are_not_listed() {
    let mut document = plant();
    document.delete_condition(1).unwrap();
    document.delete_condition(2).unwrap();
    let actual = summary::render(&document);
    assert!(actual.contains("Condition groups: 1/3\n  CG2  OR [C5]\n"), "{actual}");
    assert!(!actual.contains("CG1"), "{actual}");
}
