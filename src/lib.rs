//! `rlox` is a tree-walking interpreter for Lox, a small dynamically
//! typed, class-based scripting language with lexical scoping,
//! closures, and single inheritance.
//!
//! The pipeline has four stages, each its own module:
//!
//! - [`scanner`] turns source text into a flat token stream, recording
//!   lexical errors ([`error::ScanError`]) without stopping.
//! - [`parser`] turns tokens into a [`stmt::Stmt`]/[`expr::Expr`] tree
//!   via recursive descent, recovering from a bad statement by
//!   synchronizing at the next statement boundary.
//! - [`resolver`] walks the tree once to compute, for every variable
//!   reference, how many enclosing scopes separate it from its
//!   binding (the distance the evaluator later uses to jump straight
//!   to the right [`environment::Environment`]), and to catch
//!   everything that's syntactically valid but statically wrong (`this`
//!   outside a class, `return` at the top level, and so on).
//! - [`interpreter`] walks the resolved tree and produces the program's
//!   actual effects.
//!
//! [`Lox`] drives all four stages over a single source string and
//! accumulates the results in an [`error::Diagnostics`].

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::instrument;

pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::Diagnostics;
use interpreter::Interpreter;
use parser::Parser;
use scanner::Scanner;
use stmt::{PrintStmt, Stmt};

/// The exit status a completed run maps to, per the CLI's exit code
/// table: clean, a static (scan/parse/resolve) error, or a runtime
/// error. A REPL driver only consults this to decide whether to keep
/// prompting; it never turns it into `process::exit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Ok,
    StaticError,
    RuntimeError,
}

impl From<&Diagnostics> for RunOutcome {
    fn from(diagnostics: &Diagnostics) -> Self {
        if diagnostics.had_runtime_error() {
            RunOutcome::RuntimeError
        } else if diagnostics.had_error() {
            RunOutcome::StaticError
        } else {
            RunOutcome::Ok
        }
    }
}

/// Owns the one piece of state that survives across multiple `run`
/// calls: the interpreter (and therefore its global environment and
/// resolver distance map). A REPL is a sequence of `run` calls against
/// the same `Lox`; a single file run is one `run` call.
pub struct Lox {
    interpreter: Interpreter,
}

impl Lox {
    pub fn new() -> Self {
        Lox { interpreter: Interpreter::new() }
    }

    /// Used by tests and embedders to capture program output instead
    /// of writing to the real stdout.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Lox { interpreter: Interpreter::with_output(output) }
    }

    pub fn run_file(&mut self, path: &Path) -> std::io::Result<RunOutcome> {
        let source = fs::read_to_string(path)?;
        Ok(self.run(&source, false))
    }

    /// Runs one chunk of source text through the full pipeline. `repl`
    /// enables the REPL's bare-expression echo: a single top-level
    /// expression statement (not a `print` or declaration) has its
    /// value printed automatically, as if written `print <expr>;`.
    #[instrument(skip_all)]
    pub fn run(&mut self, source: &str, repl: bool) -> RunOutcome {
        let mut diagnostics = Diagnostics::new();

        let scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens(&mut diagnostics);
        if diagnostics.had_error() {
            return RunOutcome::from(&diagnostics);
        }

        let parser = Parser::new(tokens);
        let mut statements = parser.parse(&mut diagnostics);
        if diagnostics.had_error() {
            return RunOutcome::from(&diagnostics);
        }

        if repl {
            echo_bare_expression(&mut statements);
        }

        self.interpreter.resolver().resolve(&statements, &mut diagnostics);
        if diagnostics.had_error() {
            return RunOutcome::from(&diagnostics);
        }

        self.interpreter.interpret(&statements, &mut diagnostics);
        RunOutcome::from(&diagnostics)
    }
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

fn echo_bare_expression(statements: &mut Vec<Stmt>) {
    if let [Stmt::Expression(_)] = statements.as_slice() {
        let Stmt::Expression(expression) = statements.pop().expect("slice pattern just matched one element") else {
            unreachable!()
        };
        statements.push(Stmt::Print(PrintStmt { expr: expression.expr }));
    }
}

/// Re-exported so an embedder matching on error stage doesn't need to
/// depend on the `locals` map's key type directly.
pub type Locals = HashMap<token::Token, usize>;
