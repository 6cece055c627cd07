mod common;

use common::run;
use rlox::RunOutcome;

#[test]
fn call_function_field() {
    let output = run(r#"
        class Foo {}
        fun bar(a, b) {
            print "bar";
            print a;
            print b;
        }
        var foo = Foo();
        foo.bar = bar;
        foo.bar(1, 2);
    "#);
    assert_eq!(output, "bar\n1\n2\n");
}

#[test]
fn call_nonfunction_field_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#"
        class Foo {}
        var foo = Foo();
        foo.bar = "not fn";
        foo.bar();
    "#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn get_and_set_method() {
    let output = run(r#"
        class Foo {
            method(a) {
                print "method";
                print a;
            }
        }
        class Bar {}
        var foo = Foo();
        var bar = Bar();
        bar.method = foo.method;
        print "other";
        bar.method(1);
    "#);
    assert_eq!(output, "other\nmethod\n1\n");
}

#[test]
fn get_on_bool_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome("true.foo;");
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn get_on_class_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#"
        class Foo {}
        Foo.bar;
    "#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn get_on_function_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#"
        fun foo() {}
        foo.bar;
    "#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn get_on_nil_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome("nil.foo;");
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn get_on_number_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome("123.foo;");
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn get_on_string_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#""str".foo;"#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn many_fields() {
    let output = run(r#"
        class Foo {}
        var foo = Foo();
        foo.a = "apple";
        foo.b = "banana";
        foo.c = "cherry";
        print foo.a;
        print foo.b;
        print foo.c;
    "#);
    assert_eq!(output, "apple\nbanana\ncherry\n");
}

#[test]
fn method() {
    let output = run(r#"
        class Foo {
            bar(arg) {
                print "got method";
                print arg;
            }
        }
        Foo().bar("arg");
    "#);
    assert_eq!(output, "got method\narg\n");
}

#[test]
fn method_binds_this() {
    let output = run(r#"
        class Foo {
            sayName(a) {
                print this.name;
                print a;
            }
        }
        var foo1 = Foo();
        foo1.name = "foo1";
        var method = foo1.sayName;
        method(1);
    "#);
    assert_eq!(output, "foo1\n1\n");
}

#[test]
fn on_instance() {
    let output = run(r#"
        class Foo {}
        var foo = Foo();
        foo.bar = "bar value";
        foo.baz = "baz value";
        print foo.bar;
        print foo.baz;
        print foo.bar;
        print foo.baz;
    "#);
    assert_eq!(output, "bar value\nbaz value\nbar value\nbaz value\n");
}

#[test]
fn set_evaluation_order_evaluates_target_before_value() {
    let (_, outcome) = common::run_outcome(r#"
        undefined1.bar = undefined2;
    "#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn set_on_bool_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome("true.foo = 1;");
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn set_on_class_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#"
        class Foo {}
        Foo.bar = 1;
    "#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn set_on_function_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#"
        fun foo() {}
        foo.bar = 1;
    "#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn set_on_nil_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome("nil.foo = 1;");
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn set_on_number_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome("123.foo = 1;");
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn set_on_string_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#""str".foo = 1;"#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn undefined_property_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#"
        class Foo {}
        var foo = Foo();
        print foo.bar;
    "#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}
