mod common;

use common::run;

/// A class referenced in its own static initializer path (declared then
/// immediately printed) must resolve to itself, not to an enclosing
/// scope's binding of the same name.
#[test]
fn class_can_reference_itself_by_name() {
    let output = run(r#"
        class B {}
        print B;
    "#);
    assert_eq!(output, "<class B>\n");
}

/// A top-level function printed by name must not be confused with a
/// call to it.
#[test]
fn function_prints_as_itself_not_its_result() {
    let output = run(r#"
        fun f() { return 1; }
        print f;
    "#);
    assert_eq!(output, "<fn f>\n");
}
