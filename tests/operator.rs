mod common;

use common::run;
use rlox::RunOutcome;

#[test]
fn add() {
    let output = run(r#"
        print 123 + 456;
        print "str" + "ing";
    "#);
    assert_eq!(output, "579\nstring\n");
}

#[test]
fn add_mismatched_types_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#"print true + "a";"#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn add_number_and_instance_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#"
        class Foo {}
        print 1 + Foo();
    "#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn comparison() {
    let output = run(r#"
        print 1 < 2;
        print 2 < 2;
        print 2 < 1;

        print 1 <= 2;
        print 2 <= 2;
        print 2 <= 1;

        print 1 > 2;
        print 2 > 2;
        print 2 > 1;

        print 1 >= 2;
        print 2 >= 2;
        print 2 >= 1;
    "#);
    assert_eq!(
        output,
        "true\nfalse\nfalse\ntrue\ntrue\nfalse\nfalse\nfalse\ntrue\nfalse\ntrue\ntrue\n"
    );
}

#[test]
fn comparison_requires_numbers() {
    let (_, outcome) = common::run_outcome(r#"print "a" < "b";"#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn divide() {
    let output = run(r#"
        print 8 / 2;
        print 12.5 / 5;
    "#);
    assert_eq!(output, "4\n2.5\n");
}

#[test]
fn divide_by_zero_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome("print 1 / 0;");
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn equals() {
    let output = run(r#"
        print nil == nil;
        print true == true;
        print true == false;

        print 1 == 1;
        print 1 == 2;

        print "str" == "str";
        print "str" == "ing";
    "#);
    assert_eq!(output, "true\ntrue\nfalse\ntrue\nfalse\ntrue\nfalse\n");
}

#[test]
fn equals_class() {
    let output = run(r#"
        class Foo {}
        class Bar {}
        print Foo == Foo;
        print Foo == Bar;
        print Foo == Foo();
        print Foo() == Foo();
    "#);
    assert_eq!(output, "true\nfalse\nfalse\nfalse\n");
}

#[test]
fn equals_method() {
    let output = run(r#"
        class Foo {
            method() {}
        }
        var foo = Foo();
        var m = foo.method;
        print m == foo.method;
    "#);
    // Each access to a bound method produces a fresh `LoxFunction`, so
    // two accesses are not reference-equal even on the same instance.
    assert_eq!(output, "false\n");
}

#[test]
fn multiply() {
    let output = run(r#"
        print 5 * 3;
        print 12.34 * 0.3;
    "#);
    assert_eq!(output, "15\n3.702\n");
}

#[test]
fn multiply_requires_numbers() {
    let (_, outcome) = common::run_outcome(r#"print "a" * 2;"#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn negate() {
    let output = run(r#"
        print -(3);
        print --(3);
        print ---(3);
    "#);
    assert_eq!(output, "-3\n3\n-3\n");
}

#[test]
fn negate_non_number_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#"print -"s";"#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn not() {
    let output = run(r#"
        print !true;
        print !false;
        print !!true;
        print !nil;
    "#);
    assert_eq!(output, "false\ntrue\ntrue\ntrue\n");
}

#[test]
fn not_equals() {
    let output = run(r#"
        print nil != nil;
        print true != true;
        print true != false;
        print 1 != 1;
        print 1 != 2;
        print "str" != "str";
        print "str" != "ing";
    "#);
    assert_eq!(output, "false\nfalse\ntrue\nfalse\ntrue\nfalse\ntrue\n");
}

#[test]
fn subtract() {
    let output = run(r#"
        print 4 - 3;
        print 3 - 3;
        print 3 - 7;
        print 10 - 3;
    "#);
    assert_eq!(output, "1\n0\n-4\n7\n");
}
