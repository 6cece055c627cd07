use std::rc::Rc;

use crate::expr::Expr;
use crate::token::Token;

/// A function or method declaration's shared data.
///
/// Wrapped in `Rc` so a closure (`LoxFunction`) can hold a cheap handle
/// to its declaration that outlives the `Vec<Stmt>` the parser produced
/// it in. This matters in the REPL, where each line's statements are
/// dropped once interpreted but a function declared on one line may be
/// called from a later one.
#[derive(Debug)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

/// A statement node, dispatched on by `match` rather than a visitor
/// (see `expr::Expr` for the same choice on the expression side).
#[derive(Debug)]
pub enum Stmt {
    Expression(ExpressionStmt),
    Print(PrintStmt),
    Var(VarStmt),
    Block(BlockStmt),
    If(IfStmt),
    While(WhileStmt),
    Function(Rc<FunctionDecl>),
    Return(ReturnStmt),
    Class(ClassStmt),
    Break(Token),
    Continue(Token),
}

#[derive(Debug)]
pub struct ExpressionStmt {
    pub expr: Expr,
}

#[derive(Debug)]
pub struct PrintStmt {
    pub expr: Expr,
}

#[derive(Debug)]
pub struct VarStmt {
    pub name: Token,
    pub initializer: Option<Expr>,
}

#[derive(Debug)]
pub struct BlockStmt {
    pub statements: Vec<Stmt>,
}

#[derive(Debug)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    /// Only set for a desugared `for` loop. Run after the body on every
    /// iteration, including one resumed by `continue`, so `continue`
    /// can never skip the loop's own increment step.
    pub increment: Option<Expr>,
}

#[derive(Debug)]
pub struct ReturnStmt {
    pub keyword: Token,
    pub value: Option<Expr>,
}

#[derive(Debug)]
pub struct ClassStmt {
    pub name: Token,
    pub superclass: Option<Expr>,
    pub methods: Vec<Rc<FunctionDecl>>,
}
