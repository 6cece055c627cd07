use thiserror::Error;

use crate::object::Object;
use crate::token::{Location, Token, TokenKind};

fn at(token: &Token) -> String {
    if token.kind == TokenKind::Eof {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

/// A static error raised during scanning, before any token exists.
#[derive(Debug, Error, Clone)]
#[error("[line {}] Error: {message}", location.line)]
pub struct ScanError {
    pub location: Location,
    pub message: String,
}

/// A static error raised during parsing, bound to the offending token.
#[derive(Debug, Error, Clone)]
#[error("[line {}] Error{}: {message}", token.line(), at(token))]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

/// A static error raised during resolution.
#[derive(Debug, Error, Clone)]
#[error("[line {}] Error{}: {message}", token.line(), at(token))]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

/// A runtime error raised while evaluating a resolved AST.
#[derive(Debug, Error, Clone)]
#[error("[line {}] Error{}: {message}", token.line(), at(token))]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        RuntimeError { token, message: message.into() }
    }
}

/// The union of every error kind the pipeline can produce, exposed so a
/// caller embedding this crate as a library can match on error stage
/// rather than only seeing formatted text.
#[derive(Debug, Error, Clone)]
pub enum LoxError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// A non-error control signal: `return`, `break`, and `continue` unwind
/// the evaluator's call stack exactly like an error would, but must
/// never be reported as one. They are caught at well-defined points:
/// `Return` by the nearest function activation, `Break`/`Continue` by
/// the nearest enclosing loop.
#[derive(Debug, Clone)]
pub enum Signal {
    Return(Object),
    Break,
    Continue,
}

/// What can interrupt execution of a statement: a real runtime error,
/// or one of the non-error control signals above. Keeping them as
/// distinct `Err` arms (rather than folding signals into `RuntimeError`)
/// means a signal can never accidentally be formatted as an error
/// message as it propagates with `?`.
#[derive(Debug, Clone)]
pub enum Flow {
    Error(RuntimeError),
    Signal(Signal),
}

impl From<RuntimeError> for Flow {
    fn from(error: RuntimeError) -> Self {
        Flow::Error(error)
    }
}

pub type EvalResult<T> = Result<T, Flow>;

/// Accumulates error state across a single `run()` of the pipeline.
///
/// Each stage reports into this as it finds problems and keeps going.
/// Scanning, parsing, and resolving all continue past an error so the
/// user can fix several mistakes at once. The gate between stages is
/// `had_error()`, checked by the driver before running the next stage.
#[derive(Debug, Default)]
pub struct Diagnostics {
    had_error: bool,
    had_runtime_error: bool,
    errors: Vec<LoxError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error || self.had_runtime_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn errors(&self) -> &[LoxError] {
        &self.errors
    }

    pub fn scan_error(&mut self, location: Location, message: impl Into<String>) {
        let error = ScanError { location, message: message.into() };
        eprintln!("{error}");
        self.had_error = true;
        self.errors.push(LoxError::Scan(error));
    }

    pub fn parse_error(&mut self, error: ParseError) {
        eprintln!("{error}");
        self.had_error = true;
        self.errors.push(LoxError::Parse(error));
    }

    pub fn resolve_error(&mut self, token: Token, message: impl Into<String>) {
        let error = ResolveError { token, message: message.into() };
        eprintln!("{error}");
        self.had_error = true;
        self.errors.push(LoxError::Resolve(error));
    }

    pub fn runtime_error(&mut self, error: RuntimeError) {
        eprintln!("{error}");
        self.had_runtime_error = true;
        self.errors.push(LoxError::Runtime(error));
    }
}
