use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use tracing::instrument;

use crate::class::LoxClass;
use crate::environment::Environment;
use crate::error::{Diagnostics, EvalResult, Flow, RuntimeError, Signal};
use crate::expr::Expr;
use crate::function::{LoxFunction, NativeFunction};
use crate::object::{Callable, Object};
use crate::resolver::Resolver;
use crate::stmt::{ClassStmt, Stmt};
use crate::token::{Token, TokenKind};

/// Walks a resolved AST and produces side effects: printed output,
/// mutated environments, and the final value of expression statements.
///
/// `locals` is the resolver's distance map, keyed by the `Token`
/// identifying each variable/`this`/`super` reference. `environment`
/// is the scope currently in effect; `globals` never changes once
/// constructed and is where top-level declarations and native
/// functions live.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<Token, usize>,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_output(Box::new(io::stdout()))
    }

    /// Used by tests to capture program output instead of writing to
    /// the real stdout.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        let globals = Environment::new_global();

        let clock = NativeFunction::clock();
        globals.borrow_mut().define(clock.name, Object::NativeFunction(Rc::new(clock)));
        let input = NativeFunction::input();
        globals.borrow_mut().define(input.name, Object::NativeFunction(Rc::new(input)));

        Interpreter { environment: Rc::clone(&globals), globals, locals: HashMap::new(), output }
    }

    /// Borrows the distance map for a resolver pass over a freshly
    /// parsed program. Declarations resolved in an earlier REPL line
    /// stay in the map, since their `Token`s (and thus their entries)
    /// never collide with later lines' distinct source locations.
    pub fn resolver(&mut self) -> Resolver<'_> {
        Resolver::new(&mut self.locals)
    }

    #[instrument(skip_all)]
    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        for statement in statements {
            if let Err(flow) = self.execute(statement) {
                match flow {
                    Flow::Error(error) => {
                        diagnostics.runtime_error(error);
                        return;
                    }
                    Flow::Signal(_) => unreachable!("resolver rejects return/break/continue at top level"),
                }
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> EvalResult<()> {
        match stmt {
            Stmt::Expression(s) => {
                self.evaluate(&s.expr)?;
                Ok(())
            }
            Stmt::Print(s) => {
                let value = self.evaluate(&s.expr)?;
                writeln!(self.output, "{value}").expect("writing program output succeeds");
                Ok(())
            }
            Stmt::Var(s) => {
                let value = match &s.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Object::Nil,
                };
                self.environment.borrow_mut().define(&s.name.lexeme, value);
                Ok(())
            }
            Stmt::Block(s) => {
                let scope = Environment::new_enclosed(Rc::clone(&self.environment));
                self.execute_block(&s.statements, scope)
            }
            Stmt::If(s) => {
                if self.evaluate(&s.condition)?.is_truthy() {
                    self.execute(&s.then_branch)
                } else if let Some(else_branch) = &s.else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While(s) => self.execute_while(s),
            Stmt::Function(decl) => {
                let function = LoxFunction::new(Rc::clone(decl), Rc::clone(&self.environment), false);
                self.environment.borrow_mut().define(&decl.name.lexeme, Object::Function(Rc::new(function)));
                Ok(())
            }
            Stmt::Return(s) => {
                let value = match &s.value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Object::Nil,
                };
                Err(Flow::Signal(Signal::Return(value)))
            }
            Stmt::Class(s) => self.execute_class(s),
            Stmt::Break(_) => Err(Flow::Signal(Signal::Break)),
            Stmt::Continue(_) => Err(Flow::Signal(Signal::Continue)),
        }
    }

    fn execute_while(&mut self, s: &crate::stmt::WhileStmt) -> EvalResult<()> {
        while self.evaluate(&s.condition)?.is_truthy() {
            match self.execute(&s.body) {
                Ok(()) => {}
                Err(Flow::Signal(Signal::Break)) => break,
                Err(Flow::Signal(Signal::Continue)) => {}
                Err(other) => return Err(other),
            }

            if let Some(increment) = &s.increment {
                self.evaluate(increment)?;
            }
        }

        Ok(())
    }

    fn execute_class(&mut self, s: &ClassStmt) -> EvalResult<()> {
        let superclass = match &s.superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                match value {
                    Object::Class(class) => Some(class),
                    _ => {
                        let Expr::Variable(v) = expr else { unreachable!() };
                        return Err(RuntimeError::new(v.name.clone(), "Superclass must be a class.").into());
                    }
                }
            }
            None => None,
        };

        self.environment.borrow_mut().define(&s.name.lexeme, Object::Nil);

        let previous_environment = if let Some(superclass) = &superclass {
            let scope = Environment::new_enclosed(Rc::clone(&self.environment));
            scope.borrow_mut().define("super", Object::Class(Rc::clone(superclass)));
            Some(std::mem::replace(&mut self.environment, scope))
        } else {
            None
        };

        let mut methods = HashMap::new();
        for method in &s.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = LoxFunction::new(Rc::clone(method), Rc::clone(&self.environment), is_initializer);
            methods.insert(method.name.lexeme.clone(), Rc::new(function));
        }

        if let Some(previous) = previous_environment {
            self.environment = previous;
        }

        let class = LoxClass::new(s.name.lexeme.clone(), superclass, methods);
        self.environment.borrow_mut().assign(&s.name, Object::Class(Rc::new(class)))?;

        Ok(())
    }

    /// Runs `statements` in `scope`, restoring the previous environment
    /// on every exit path: normal completion, an early `return`, a
    /// loop signal, or a runtime error.
    pub fn execute_block(&mut self, statements: &[Stmt], scope: Rc<RefCell<Environment>>) -> EvalResult<()> {
        let previous = std::mem::replace(&mut self.environment, scope);

        let mut result = Ok(());
        for statement in statements {
            if let Err(flow) = self.execute(statement) {
                result = Err(flow);
                break;
            }
        }

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult<Object> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Variable(e) => self.look_up_variable(&e.name).map_err(Flow::Error),
            Expr::Assign(e) => {
                let value = self.evaluate(&e.value)?;
                match self.locals.get(&e.name) {
                    Some(&distance) => Environment::assign_at(&self.environment, distance, &e.name.lexeme, value.clone()),
                    None => self.globals.borrow_mut().assign(&e.name, value.clone())?,
                }
                Ok(value)
            }
            Expr::Unary(e) => self.evaluate_unary(e),
            Expr::Binary(e) => self.evaluate_binary(e),
            Expr::Logical(e) => {
                let left = self.evaluate(&e.left)?;
                if e.operator.kind == TokenKind::Or {
                    if left.is_truthy() { return Ok(left); }
                } else if !left.is_truthy() {
                    return Ok(left);
                }
                self.evaluate(&e.right)
            }
            Expr::Grouping(e) => self.evaluate(&e.expression),
            Expr::Call(e) => self.evaluate_call(e),
            Expr::Get(e) => self.evaluate_get(e),
            Expr::Set(e) => self.evaluate_set(e),
            Expr::This(e) => self.look_up_variable(&e.keyword).map_err(Flow::Error),
            Expr::Super(e) => self.evaluate_super(e),
            Expr::Ternary(e) => {
                if self.evaluate(&e.condition)?.is_truthy() {
                    self.evaluate(&e.then_branch)
                } else {
                    self.evaluate(&e.else_branch)
                }
            }
            Expr::Chain(e) => {
                self.evaluate(&e.left)?;
                self.evaluate(&e.right)
            }
        }
    }

    fn look_up_variable(&self, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(name) {
            Some(&distance) => Ok(Environment::get_at(&self.environment, distance, &name.lexeme)),
            None => self.globals.borrow().get(name),
        }
    }

    fn evaluate_unary(&mut self, e: &crate::expr::UnaryExpr) -> EvalResult<Object> {
        let right = self.evaluate(&e.right)?;

        match e.operator.kind {
            TokenKind::Minus => match right {
                Object::Number(n) => Ok(Object::Number(-n)),
                _ => Err(RuntimeError::new(e.operator.clone(), "Operand must be a number.").into()),
            },
            TokenKind::Bang => Ok(Object::Bool(!right.is_truthy())),
            _ => unreachable!("the parser only produces '-' or '!' as a unary operator"),
        }
    }

    fn evaluate_binary(&mut self, e: &crate::expr::BinaryExpr) -> EvalResult<Object> {
        let left = self.evaluate(&e.left)?;
        let right = self.evaluate(&e.right)?;
        let operator = &e.operator;

        macro_rules! numeric {
            ($op:tt) => {
                match (&left, &right) {
                    (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l $op r)),
                    _ => Err(RuntimeError::new(operator.clone(), "All operands must be numbers.").into()),
                }
            };
        }

        macro_rules! comparison {
            ($op:tt) => {
                match (&left, &right) {
                    (Object::Number(l), Object::Number(r)) => Ok(Object::Bool(l $op r)),
                    _ => Err(RuntimeError::new(operator.clone(), "All operands must be numbers.").into()),
                }
            };
        }

        match operator.kind {
            TokenKind::Minus => numeric!(-),
            TokenKind::Star => numeric!(*),
            TokenKind::Greater => comparison!(>),
            TokenKind::GreaterEqual => comparison!(>=),
            TokenKind::Less => comparison!(<),
            TokenKind::LessEqual => comparison!(<=),
            TokenKind::Slash => match (&left, &right) {
                (Object::Number(_), Object::Number(r)) if *r == 0.0 => {
                    Err(RuntimeError::new(operator.clone(), "Attempted to divide by zero.").into())
                }
                (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l / r)),
                _ => Err(RuntimeError::new(operator.clone(), "All operands must be numbers.").into()),
            },
            TokenKind::Percent => match (&left, &right) {
                (Object::Number(_), Object::Number(r)) if *r == 0.0 => {
                    Err(RuntimeError::new(operator.clone(), "Attempted to divide by zero.").into())
                }
                (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l % r)),
                _ => Err(RuntimeError::new(operator.clone(), "All operands must be numbers.").into()),
            },
            TokenKind::Plus => match (&left, &right) {
                (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l + r)),
                (Object::String(l), Object::String(r)) => Ok(Object::String(Rc::from(format!("{l}{r}")))),
                _ => Err(RuntimeError::new(operator.clone(), "Operands must be two numbers or two strings.").into()),
            },
            TokenKind::EqualEqual => Ok(Object::Bool(left == right)),
            TokenKind::BangEqual => Ok(Object::Bool(left != right)),
            _ => unreachable!("the parser only produces arithmetic/comparison/equality tokens as binary operators"),
        }
    }

    fn evaluate_call(&mut self, e: &crate::expr::CallExpr) -> EvalResult<Object> {
        let callee = self.evaluate(&e.callee)?;

        let mut arguments = Vec::with_capacity(e.arguments.len());
        for argument in &e.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        if let Object::Class(class) = &callee {
            let arity = class.arity();
            if arguments.len() != arity {
                return Err(RuntimeError::new(
                    e.paren.clone(),
                    format!("Expected {arity} arguments, but got {}.", arguments.len()),
                )
                .into());
            }
            return Ok(LoxClass::construct(class, self, arguments)?);
        }

        let Some(callable) = callee.as_callable() else {
            return Err(RuntimeError::new(e.paren.clone(), "Can only call functions and classes.").into());
        };

        if arguments.len() != callable.arity() {
            return Err(RuntimeError::new(
                e.paren.clone(),
                format!("Expected {} arguments, but got {}.", callable.arity(), arguments.len()),
            )
            .into());
        }

        Ok(callable.call(self, arguments)?)
    }

    fn evaluate_get(&mut self, e: &crate::expr::GetExpr) -> EvalResult<Object> {
        let object = self.evaluate(&e.object)?;

        match &object {
            Object::Instance(instance) => Ok(instance.borrow().get(&e.name, &object)?),
            _ => Err(RuntimeError::new(e.name.clone(), "Only instances have properties.").into()),
        }
    }

    fn evaluate_set(&mut self, e: &crate::expr::SetExpr) -> EvalResult<Object> {
        let object = self.evaluate(&e.object)?;

        let Object::Instance(instance) = &object else {
            return Err(RuntimeError::new(e.name.clone(), "Only instances have fields.").into());
        };

        let value = self.evaluate(&e.value)?;
        instance.borrow_mut().set(&e.name, value.clone());
        Ok(value)
    }

    fn evaluate_super(&mut self, e: &crate::expr::SuperExpr) -> EvalResult<Object> {
        let distance = *self.locals.get(&e.keyword).expect("resolver always resolves a 'super' reference");

        let Object::Class(superclass) = Environment::get_at(&self.environment, distance, "super") else {
            unreachable!("the resolver only binds 'super' to a class value")
        };

        let this = Environment::get_at(&self.environment, distance - 1, "this");

        let method = superclass
            .find_method(&e.method.lexeme)
            .ok_or_else(|| RuntimeError::new(e.method.clone(), format!("Undefined property '{}'.", e.method.lexeme)))?;

        Ok(Object::Function(Rc::new(method.bind(this))))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
