mod common;

use common::run;
use rlox::RunOutcome;

#[test]
fn after_else() {
    let output = run(r#"
        fun f() {
            if (false) "unreachable"; else return "ok";
            print "bad";
        }
        print f();
    "#);
    assert_eq!(output, "ok\n");
}

#[test]
fn after_if() {
    let output = run(r#"
        fun f() {
            if (true) return "ok";
            print "bad";
        }
        print f();
    "#);
    assert_eq!(output, "ok\n");
}

#[test]
fn after_while() {
    let output = run(r#"
        fun f() {
            while (true) return "ok";
            print "bad";
        }
        print f();
    "#);
    assert_eq!(output, "ok\n");
}

#[test]
fn at_top_level_is_a_static_error() {
    let (_, outcome) = common::run_outcome("return \"bad\";");
    assert_eq!(outcome, RunOutcome::StaticError);
}

#[test]
fn in_function() {
    let output = run(r#"
        fun f() { return "ok"; print "bad"; }
        print f();
    "#);
    assert_eq!(output, "ok\n");
}

#[test]
fn in_method() {
    let output = run(r#"
        class Foo {
            method() { return "ok"; print "bad"; }
        }
        print Foo().method();
    "#);
    assert_eq!(output, "ok\n");
}

#[test]
fn return_nil_if_no_value() {
    let output = run(r#"
        fun f() { return; }
        print f();
    "#);
    assert_eq!(output, "nil\n");
}
