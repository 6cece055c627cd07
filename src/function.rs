use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{Flow, RuntimeError, Signal};
use crate::interpreter::Interpreter;
use crate::object::{Callable, Object};
use crate::stmt::FunctionDecl;

/// A user-defined function or method, closed over the environment it
/// was declared in.
#[derive(Debug)]
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: Rc<RefCell<Environment>>,
    is_initializer: bool,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        LoxFunction { declaration, closure, is_initializer }
    }

    /// Produces a copy of this function whose closure has `this` bound
    /// to `instance`, one scope removed from the original closure.
    /// Called once per method lookup so each instance gets its own
    /// `this` without mutating the class's shared method table.
    pub fn bind(&self, instance: Object) -> LoxFunction {
        let environment = Environment::new_enclosed(Rc::clone(&self.closure));
        environment.borrow_mut().define("this", instance);
        LoxFunction::new(Rc::clone(&self.declaration), environment, self.is_initializer)
    }
}

impl Callable for LoxFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let environment = Environment::new_enclosed(Rc::clone(&self.closure));

        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            environment.borrow_mut().define(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.declaration.body, environment) {
            Ok(()) => {
                if self.is_initializer {
                    Ok(Environment::get_at(&self.closure, 0, "this"))
                } else {
                    Ok(Object::Nil)
                }
            }
            Err(Flow::Signal(Signal::Return(value))) => {
                if self.is_initializer {
                    Ok(Environment::get_at(&self.closure, 0, "this"))
                } else {
                    Ok(value)
                }
            }
            Err(Flow::Error(error)) => Err(error),
            Err(Flow::Signal(Signal::Break | Signal::Continue)) => {
                unreachable!("resolver rejects break/continue outside a loop")
            }
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Display for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

/// A function implemented in Rust and exposed to Lox under a fixed name,
/// used for host-provided facilities the language itself can't express
/// (wall-clock time, reading a line of input).
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl NativeFunction {
    pub fn clock() -> NativeFunction {
        NativeFunction {
            name: "clock",
            arity: 0,
            func: |_, _| {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .expect("system clock is after the Unix epoch")
                    .as_secs_f64();
                Ok(Object::Number(now))
            },
        }
    }

    pub fn input() -> NativeFunction {
        NativeFunction {
            name: "input",
            arity: 0,
            func: |_, _| {
                let mut line = String::new();
                std::io::stdin()
                    .read_line(&mut line)
                    .expect("stdin is readable");
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Ok(Object::String(Rc::from(line)))
            },
        }
    }
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.func)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
