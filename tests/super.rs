mod common;

use common::run;
use rlox::RunOutcome;

#[test]
fn bound_method() {
    let output = run(r#"
        class Base {
            method() { print "Base.method()"; }
        }
        class Derived < Base {}
        var method = Derived().method;
        method();
    "#);
    assert_eq!(output, "Base.method()\n");
}

#[test]
fn call_other_method() {
    let output = run(r#"
        class Base {
            foo() { print "Base.foo()"; }
        }
        class Derived < Base {
            bar() {
                print "Derived.bar()";
                super.foo();
            }
        }
        Derived().bar();
    "#);
    assert_eq!(output, "Derived.bar()\nBase.foo()\n");
}

#[test]
fn call_same_method() {
    let output = run(r#"
        class Base {
            foo() { print "Base.foo()"; }
        }
        class Derived < Base {
            foo() {
                print "Derived.foo()";
                super.foo();
            }
        }
        Derived().foo();
    "#);
    assert_eq!(output, "Derived.foo()\nBase.foo()\n");
}

#[test]
fn closure_keeps_its_own_superclass() {
    let output = run(r#"
        class Base {
            toString() { return "Base"; }
        }
        class Derived < Base {
            getClosure() {
                fun closure() {
                    return super.toString();
                }
                return closure;
            }
        }
        print Derived().getClosure()();
    "#);
    assert_eq!(output, "Base\n");
}

#[test]
fn constructor_chain() {
    let output = run(r#"
        class Base {
            init(a, b) { print "Base.init(" + a + ", " + b + ")"; }
        }
        class Derived < Base {
            init() {
                print "Derived.init()";
                super.init("a", "b");
            }
        }
        Derived();
    "#);
    assert_eq!(output, "Derived.init()\nBase.init(a, b)\n");
}

#[test]
fn extra_arguments_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#"
        class Base {
            foo(a, b) {}
        }
        class Derived < Base {
            bar() { super.foo(1, 2, 3, 4); }
        }
        Derived().bar();
    "#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn indirectly_inherited() {
    let output = run(r#"
        class A {
            foo() { print "A.foo()"; }
        }
        class B < A {}
        class C < B {
            foo() {
                print "C.foo()";
                super.foo();
            }
        }
        C().foo();
    "#);
    assert_eq!(output, "C.foo()\nA.foo()\n");
}

#[test]
fn no_superclass_method_is_a_runtime_error() {
    let (_, outcome) = common::run_outcome(r#"
        class Base {}
        class Derived < Base {
            foo() { super.doesNotExist(); }
        }
        Derived().foo();
    "#);
    assert_eq!(outcome, RunOutcome::RuntimeError);
}

#[test]
fn no_superclass_is_a_static_error() {
    let (_, outcome) = common::run_outcome(r#"
        class Base {
            foo() { super.doesNotExist(); }
        }
    "#);
    assert_eq!(outcome, RunOutcome::StaticError);
}

#[test]
fn super_without_dot_is_a_static_error() {
    let (_, outcome) = common::run_outcome(r#"
        class Base {}
        class Derived < Base {
            foo() { super; }
        }
    "#);
    assert_eq!(outcome, RunOutcome::StaticError);
}

#[test]
fn super_at_top_level_is_a_static_error() {
    let (_, outcome) = common::run_outcome("super.foo();");
    assert_eq!(outcome, RunOutcome::StaticError);
}

#[test]
fn reassigning_the_superclass_name_does_not_change_a_bound_super() {
    let output = run(r#"
        class Base {
            method() { print "Base.method()"; }
        }
        class Derived < Base {
            method() { super.method(); }
        }
        class OtherBase {
            method() { print "OtherBase.method()"; }
        }
        Base = OtherBase;
        Derived().method();
    "#);
    // `Base` is captured by value when `Derived` is declared, so
    // reassigning the global `Base` name afterward has no effect on the
    // class object `super` already closed over.
    assert_eq!(output, "Base.method()\n");
}

#[test]
fn this_in_superclass_method() {
    let output = run(r#"
        class Base {
            init() { this.a = "a"; }
            getA() { return this.a; }
        }
        class Derived < Base {
            init() {
                super.init();
                this.b = "b";
            }
            getB() { return this.b; }
        }
        var d = Derived();
        print d.getA();
        print d.getB();
    "#);
    assert_eq!(output, "a\nb\n");
}
