use std::collections::HashMap;
use std::mem;

use crate::error::Diagnostics;
use crate::expr::Expr;
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::Token;

#[derive(Clone, Copy, PartialEq)]
enum FunctionKind {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Clone, Copy, PartialEq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

/// Walks the AST once after parsing to compute, for every variable
/// reference, how many enclosing scopes separate it from its binding
/// (its "distance"). The evaluator uses that distance to jump straight
/// to the right `Environment` instead of re-searching scope by scope,
/// which is what makes closures over reassigned locals behave
/// correctly. Also the home of every purely static check: use of
/// `this`/`super`/`return`/`break`/`continue` outside their context,
/// self-inheriting classes, and reading a local in its own initializer.
pub struct Resolver<'a> {
    locals: &'a mut HashMap<Token, usize>,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionKind,
    current_class: ClassKind,
    loop_depth: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(locals: &'a mut HashMap<Token, usize>) -> Self {
        Resolver {
            locals,
            scopes: Vec::new(),
            current_function: FunctionKind::None,
            current_class: ClassKind::None,
            loop_depth: 0,
        }
    }

    pub fn resolve(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        for statement in statements {
            self.resolve_stmt(statement, diagnostics);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt, diagnostics: &mut Diagnostics) {
        match stmt {
            Stmt::Expression(s) => self.resolve_expr(&s.expr, diagnostics),
            Stmt::Print(s) => self.resolve_expr(&s.expr, diagnostics),
            Stmt::Var(s) => {
                self.declare(&s.name, diagnostics);
                if let Some(initializer) = &s.initializer {
                    self.resolve_expr(initializer, diagnostics);
                }
                self.define(&s.name);
            }
            Stmt::Block(s) => {
                self.begin_scope();
                self.resolve(&s.statements, diagnostics);
                self.end_scope();
            }
            Stmt::If(s) => {
                self.resolve_expr(&s.condition, diagnostics);
                self.resolve_stmt(&s.then_branch, diagnostics);
                if let Some(else_branch) = &s.else_branch {
                    self.resolve_stmt(else_branch, diagnostics);
                }
            }
            Stmt::While(s) => {
                self.resolve_expr(&s.condition, diagnostics);
                self.loop_depth += 1;
                self.resolve_stmt(&s.body, diagnostics);
                if let Some(increment) = &s.increment {
                    self.resolve_expr(increment, diagnostics);
                }
                self.loop_depth -= 1;
            }
            Stmt::Function(decl) => {
                self.declare(&decl.name, diagnostics);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionKind::Function, diagnostics);
            }
            Stmt::Return(s) => {
                if self.current_function == FunctionKind::None {
                    diagnostics.resolve_error(s.keyword.clone(), "Cannot return from top-level code.");
                }

                if let Some(value) = &s.value {
                    if self.current_function == FunctionKind::Initializer {
                        diagnostics.resolve_error(s.keyword.clone(), "Cannot return a value from an initializer.");
                    } else {
                        self.resolve_expr(value, diagnostics);
                    }
                }
            }
            Stmt::Class(s) => self.resolve_class(s, diagnostics),
            Stmt::Break(keyword) => {
                if self.loop_depth == 0 {
                    diagnostics.resolve_error(keyword.clone(), "Cannot break outside of a loop.");
                }
            }
            Stmt::Continue(keyword) => {
                if self.loop_depth == 0 {
                    diagnostics.resolve_error(keyword.clone(), "Cannot continue outside of a loop.");
                }
            }
        }
    }

    fn resolve_class(&mut self, class: &crate::stmt::ClassStmt, diagnostics: &mut Diagnostics) {
        let enclosing_class = mem::replace(&mut self.current_class, ClassKind::Class);

        self.declare(&class.name, diagnostics);
        self.define(&class.name);

        if let Some(superclass) = &class.superclass {
            let Expr::Variable(variable) = superclass else {
                unreachable!("the parser only ever produces a Variable expression for a superclass clause")
            };

            if class.name.lexeme == variable.name.lexeme {
                diagnostics.resolve_error(variable.name.clone(), "A class cannot inherit from itself.");
            }

            self.current_class = ClassKind::Subclass;
            self.resolve_expr(superclass, diagnostics);

            self.begin_scope();
            self.scopes.last_mut().expect("scope just pushed").insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().expect("scope just pushed").insert("this".to_string(), true);

        for method in &class.methods {
            let kind =
                if method.name.lexeme == "init" { FunctionKind::Initializer } else { FunctionKind::Method };
            self.resolve_function(method, kind, diagnostics);
        }

        self.end_scope();

        if class.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_function(&mut self, function: &FunctionDecl, kind: FunctionKind, diagnostics: &mut Diagnostics) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);
        let enclosing_loop_depth = mem::replace(&mut self.loop_depth, 0);

        self.begin_scope();
        for param in &function.params {
            self.declare(param, diagnostics);
            self.define(param);
        }
        self.resolve(&function.body, diagnostics);
        self.end_scope();

        self.current_function = enclosing_function;
        self.loop_depth = enclosing_loop_depth;
    }

    fn resolve_expr(&mut self, expr: &Expr, diagnostics: &mut Diagnostics) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Variable(e) => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&e.name.lexeme) == Some(&false) {
                        diagnostics
                            .resolve_error(e.name.clone(), "Cannot read local variable in its own initializer.");
                    }
                }
                self.resolve_local(&e.name);
            }
            Expr::Assign(e) => {
                self.resolve_expr(&e.value, diagnostics);
                self.resolve_local(&e.name);
            }
            Expr::Unary(e) => self.resolve_expr(&e.right, diagnostics),
            Expr::Binary(e) => {
                self.resolve_expr(&e.left, diagnostics);
                self.resolve_expr(&e.right, diagnostics);
            }
            Expr::Logical(e) => {
                self.resolve_expr(&e.left, diagnostics);
                self.resolve_expr(&e.right, diagnostics);
            }
            Expr::Grouping(e) => self.resolve_expr(&e.expression, diagnostics),
            Expr::Call(e) => {
                self.resolve_expr(&e.callee, diagnostics);
                for argument in &e.arguments {
                    self.resolve_expr(argument, diagnostics);
                }
            }
            Expr::Get(e) => self.resolve_expr(&e.object, diagnostics),
            Expr::Set(e) => {
                self.resolve_expr(&e.value, diagnostics);
                self.resolve_expr(&e.object, diagnostics);
            }
            Expr::This(e) => {
                if self.current_class == ClassKind::None {
                    diagnostics.resolve_error(e.keyword.clone(), "Cannot use 'this' outside of a class.");
                    return;
                }
                self.resolve_local(&e.keyword);
            }
            Expr::Super(e) => {
                match self.current_class {
                    ClassKind::Subclass => {}
                    ClassKind::None => {
                        diagnostics.resolve_error(e.keyword.clone(), "Cannot use 'super' outside of a class.");
                    }
                    ClassKind::Class => {
                        diagnostics
                            .resolve_error(e.keyword.clone(), "Cannot use 'super' in a class with no superclass.");
                    }
                }
                self.resolve_local(&e.keyword);
            }
            Expr::Ternary(e) => {
                self.resolve_expr(&e.condition, diagnostics);
                self.resolve_expr(&e.then_branch, diagnostics);
                self.resolve_expr(&e.else_branch, diagnostics);
            }
            Expr::Chain(e) => {
                self.resolve_expr(&e.left, diagnostics);
                self.resolve_expr(&e.right, diagnostics);
            }
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token, diagnostics: &mut Diagnostics) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            diagnostics.resolve_error(
                name.clone(),
                format!("A variable is already declared with name '{}' in this scope.", name.lexeme),
            );
        }
        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn resolve_local(&mut self, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.locals.insert(name.clone(), depth);
                return;
            }
        }
        // Not found in any local scope: treated as a global at runtime.
    }
}
