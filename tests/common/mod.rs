use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use rlox::{Lox, RunOutcome};

/// A `Write` sink backed by a reference-counted buffer, so a test can
/// hand one handle to the interpreter and keep another to read back
/// what was printed once the run is done.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `source` as a single script (not REPL mode) against a fresh
/// interpreter and returns everything it printed.
pub fn run(source: &str) -> String {
    run_outcome(source).0
}

pub fn run_outcome(source: &str) -> (String, RunOutcome) {
    let buffer = SharedBuffer::default();
    let mut lox = Lox::with_output(Box::new(buffer.clone()));
    let outcome = lox.run(source, false);
    let printed = buffer.0.borrow().clone();
    (String::from_utf8(printed).expect("program output is valid utf-8"), outcome)
}

/// Writes `source` to a uniquely named file under the target directory
/// and returns its path, for the handful of tests that exercise the
/// actual `rlox` binary (exit codes, stderr formatting) via `assert_cmd`
/// rather than the library directly.
pub fn script_file(source: &str) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR"));
    dir.push("rlox-scripts");
    fs::create_dir_all(&dir).expect("can create scratch directory for test scripts");

    let id = COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = dir.join(format!("{id}.lox"));
    fs::write(&path, source).expect("can write test script");
    path
}
