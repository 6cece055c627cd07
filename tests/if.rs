mod common;

use common::run;
use rlox::RunOutcome;

#[test]
fn dangling_else_binds_to_the_nearest_if() {
    let output = run(r#"
        if (true) if (false) print "bad"; else print "good";
    "#);
    assert_eq!(output, "good\n");
}

#[test]
fn if_flow() {
    let output = run(r#"
        if (true) print "good";
        if (false) print "bad";

        if (true) {
            print "block";
        }

        var a = false;
        if (a = true) print a;
    "#);
    assert_eq!(output, "good\nblock\ntrue\n");
}

#[test]
fn else_flow() {
    let output = run(r#"
        if (true) print "good"; else print "bad";
        if (false) print "bad"; else print "good";

        if (false) {
            print "bad";
        } else {
            print "block";
        }
    "#);
    assert_eq!(output, "good\ngood\nblock\n");
}

#[test]
fn truth() {
    let output = run(r#"
        if (false) print "bad"; else print "false";
        if (nil) print "bad"; else print "null";
        if (true) print "true";
        if (0) print "0";
        if ("") print "empty";
    "#);
    assert_eq!(output, "false\nnull\ntrue\n0\nempty\n");
}

#[test]
fn condition_must_parse_as_an_expression() {
    let (_, outcome) = common::run_outcome("if (true) class Foo {}");
    assert_eq!(outcome, RunOutcome::StaticError);
}
