mod common;

use common::run;

#[test]
fn line_at_eof() {
    let output = run("print \"ok\"; // comment");
    assert_eq!(output, "ok\n");
}

#[test]
fn only_line_comment() {
    let output = run("// comment");
    assert_eq!(output, "");
}

#[test]
fn block_comment() {
    let output = run("/* comment\nspanning lines */ print \"ok\";");
    assert_eq!(output, "ok\n");
}

#[test]
fn unterminated_block_comment_is_a_static_error() {
    let (_, outcome) = common::run_outcome("/* never closed");
    assert_eq!(outcome, rlox::RunOutcome::StaticError);
}

#[test]
fn unicode() {
    let output = run("// 上好,世界\nprint \"ok\";");
    assert_eq!(output, "ok\n");
}
