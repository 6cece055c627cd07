mod common;

use common::run;
use rlox::RunOutcome;

#[test]
fn empty_file() {
    let output = run("");
    assert_eq!(output, "");
}

#[test]
fn precedence() {
    let output = run(r#"
        print 2 + 3 * 4;
        print 20 - 3 * 4;
        print (2 + 3) * 4 - 4;
        print 3 - 2 - 1;
        print 1 < 2 == 2 < 3;
        print 2 < 1 == 1 < 2;
        print false == 2 < 1;
        print true == 1 < 2;
        print 0 or 0 and 0;
        print -1 - -1;
    "#);
    assert_eq!(output, "14\n8\n16\n0\ntrue\nfalse\ntrue\ntrue\n0\n0\n");
}

#[test]
fn unexpected_character_is_a_static_error() {
    let (_, outcome) = common::run_outcome("var a = 1;\nvar b = 2;\nvar c = a | b;");
    assert_eq!(outcome, RunOutcome::StaticError);
}
