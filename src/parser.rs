use std::rc::Rc;

use crate::error::{Diagnostics, ParseError};
use crate::expr::*;
use crate::object::Object;
use crate::stmt::*;
use crate::token::{Token, TokenKind};

type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser producing a `Vec<Stmt>` from a flat token
/// stream. Follows this grammar (lowest to highest precedence):
///
/// - program     -> declaration* EOF ;
/// - declaration -> classDecl | funDecl | varDecl | statement ;
/// - classDecl   -> "class" IDENTIFIER ( "<" IDENTIFIER )? "{" function* "}" ;
/// - funDecl     -> "fun" function ;
/// - varDecl     -> "var" IDENTIFIER ( "=" expression )? ";" ;
/// - function    -> IDENTIFIER "(" parameters? ")" block ;
/// - parameters  -> IDENTIFIER ( "," IDENTIFIER )* ;
/// - statement   -> exprStmt | forStmt | ifStmt | printStmt | returnStmt
///                 | whileStmt | breakStmt | continueStmt | block ;
/// - exprStmt    -> expression ";" ;
/// - forStmt     -> "for" "(" ( varDecl | exprStmt | ";" ) expression? ";" expression? ")" statement ;
/// - ifStmt      -> "if" "(" expression ")" statement ( "else" statement )? ;
/// - printStmt   -> "print" expression ";" ;
/// - returnStmt  -> "return" expression? ";" ;
/// - whileStmt   -> "while" "(" expression ")" statement ;
/// - breakStmt   -> "break" ";" ;
/// - continueStmt -> "continue" ";" ;
/// - expression  -> assignment ( "," assignment )* ;
/// - assignment  -> ( call "." )? IDENTIFIER "=" assignment | conditional ;
/// - conditional -> logic_or ( "?" expression ":" conditional )? ;
/// - logic_or    -> logic_and ( "or" logic_and )* ;
/// - logic_and   -> equality ( "and" equality )* ;
/// - equality    -> comparison ( ( "!=" | "==" ) comparison )* ;
/// - comparison  -> term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
/// - term        -> factor ( ( "+" | "-" ) factor )* ;
/// - factor      -> unary ( ( "*" | "/" | "%" ) unary )* ;
/// - unary       -> ( "!" | "-" ) unary | call ;
/// - call        -> primary ( "(" arguments? ")" | "." IDENTIFIER )* ;
/// - arguments   -> expression ( "," expression )* ;
/// - primary     -> NUMBER | STRING | "false" | "true" | "nil" | "this"
///                 | "(" expression ")" | IDENTIFIER | "super" "." IDENTIFIER ;
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    loop_depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0, loop_depth: 0 }
    }

    pub fn parse(mut self, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration(diagnostics) {
                statements.push(stmt);
            }
        }

        statements
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|kind| self.check(*kind)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<&Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        Err(ParseError { token: self.peek().clone(), message: message.to_string() })
    }

    fn declaration(&mut self, diagnostics: &mut Diagnostics) -> Option<Stmt> {
        let result = if self.matches(&[TokenKind::Class]) {
            self.class_declaration(diagnostics)
        } else if self.matches(&[TokenKind::Fun]) {
            self.function("function", diagnostics).map(|decl| Stmt::Function(Rc::new(decl)))
        } else if self.matches(&[TokenKind::Var]) {
            self.var_declaration()
        } else {
            self.statement(diagnostics)
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                diagnostics.parse_error(error);
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect class name.")?.clone();

        let superclass = if self.matches(&[TokenKind::Less]) {
            self.consume(TokenKind::Identifier, "Expect superclass name.")?;
            Some(Expr::Variable(VariableExpr { name: self.previous().clone() }))
        } else {
            None
        };

        self.consume(TokenKind::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            methods.push(Rc::new(self.function("method", diagnostics)?));
        }

        self.consume(TokenKind::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class(ClassStmt { name, superclass, methods }))
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?.clone();

        let initializer = if self.matches(&[TokenKind::Equal]) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var(VarStmt { name, initializer }))
    }

    fn statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        if self.matches(&[TokenKind::For]) {
            return self.for_statement(diagnostics);
        }
        if self.matches(&[TokenKind::If]) {
            return self.if_statement(diagnostics);
        }
        if self.matches(&[TokenKind::Print]) {
            return self.print_statement();
        }
        if self.matches(&[TokenKind::Return]) {
            return self.return_statement();
        }
        if self.matches(&[TokenKind::While]) {
            return self.while_statement(diagnostics);
        }
        if self.matches(&[TokenKind::Break]) {
            return self.break_statement();
        }
        if self.matches(&[TokenKind::Continue]) {
            return self.continue_statement();
        }
        if self.matches(&[TokenKind::LeftBrace]) {
            return Ok(Stmt::Block(BlockStmt { statements: self.block(diagnostics) }));
        }

        self.expression_statement()
    }

    fn break_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        if self.loop_depth == 0 {
            return Err(ParseError { token: keyword, message: "Cannot break outside of a loop.".to_string() });
        }
        self.consume(TokenKind::Semicolon, "Expect ';' after 'break'.")?;
        Ok(Stmt::Break(keyword))
    }

    fn continue_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        if self.loop_depth == 0 {
            return Err(ParseError { token: keyword, message: "Cannot continue outside of a loop.".to_string() });
        }
        self.consume(TokenKind::Semicolon, "Expect ';' after 'continue'.")?;
        Ok(Stmt::Continue(keyword))
    }

    fn while_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after condition.")?;

        self.loop_depth += 1;
        let body = self.statement(diagnostics);
        self.loop_depth -= 1;

        Ok(Stmt::While(WhileStmt { condition, body: Box::new(body?), increment: None }))
    }

    fn for_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.matches(&[TokenKind::Semicolon]) {
            None
        } else if self.matches(&[TokenKind::Var]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(TokenKind::Semicolon) { Some(self.expression()?) } else { None };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(TokenKind::RightParen) { Some(self.expression()?) } else { None };
        self.consume(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        self.loop_depth += 1;
        let body = self.statement(diagnostics);
        self.loop_depth -= 1;
        let body = body?;

        let condition = condition.unwrap_or(Expr::Literal(Object::Bool(true)));
        let mut while_stmt = Stmt::While(WhileStmt { condition, body: Box::new(body), increment });

        if let Some(initializer) = initializer {
            while_stmt = Stmt::Block(BlockStmt { statements: vec![initializer, while_stmt] });
        }

        Ok(while_stmt)
    }

    fn if_statement(&mut self, diagnostics: &mut Diagnostics) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement(diagnostics)?);
        let else_branch = if self.matches(&[TokenKind::Else]) {
            Some(Box::new(self.statement(diagnostics)?))
        } else {
            None
        };

        Ok(Stmt::If(IfStmt { condition, then_branch, else_branch }))
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(PrintStmt { expr }))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let value = if !self.check(TokenKind::Semicolon) { Some(self.expression()?) } else { None };

        self.consume(TokenKind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return(ReturnStmt { keyword, value }))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(ExpressionStmt { expr }))
    }

    fn function(&mut self, kind: &str, diagnostics: &mut Diagnostics) -> ParseResult<FunctionDecl> {
        let name = self.consume(TokenKind::Identifier, &format!("Expect {kind} name."))?.clone();

        self.consume(TokenKind::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if params.len() >= 255 {
                    return Err(ParseError {
                        token: self.peek().clone(),
                        message: "Cannot have more than 255 parameters.".to_string(),
                    });
                }

                params.push(self.consume(TokenKind::Identifier, "Expect parameter name.")?.clone());

                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "Expect ')' after parameters.")?;
        self.consume(TokenKind::LeftBrace, &format!("Expect '{{' before {kind} body."))?;

        let body = self.block(diagnostics);

        Ok(FunctionDecl { name, params, body })
    }

    /// Like the top-level loop in `parse`, a bad declaration inside a
    /// block is recorded and skipped rather than aborting the parse.
    fn block(&mut self, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration(diagnostics) {
                statements.push(stmt);
            }
        }

        if let Err(error) = self.consume(TokenKind::RightBrace, "Expect '}' after block.") {
            diagnostics.parse_error(error);
        }

        statements
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        let mut expr = self.assignment()?;

        while self.matches(&[TokenKind::Comma]) {
            let right = self.assignment()?;
            expr = Expr::Chain(ChainExpr { left: Box::new(expr), right: Box::new(right) });
        }

        Ok(expr)
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.conditional()?;

        if self.matches(&[TokenKind::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable(variable) => {
                    Ok(Expr::Assign(AssignExpr { name: variable.name, value: Box::new(value) }))
                }
                Expr::Get(get) => {
                    Ok(Expr::Set(SetExpr { object: get.object, name: get.name, value: Box::new(value) }))
                }
                _ => Err(ParseError { token: equals, message: "Invalid assignment target.".to_string() }),
            };
        }

        Ok(expr)
    }

    fn conditional(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if self.matches(&[TokenKind::Question]) {
            let then_branch = self.expression()?;
            self.consume(TokenKind::Colon, "Expect ':' after ternary 'then' branch.")?;
            let else_branch = self.conditional()?;

            return Ok(Expr::Ternary(TernaryExpr {
                condition: Box::new(expr),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            }));
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while self.matches(&[TokenKind::Or]) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical(LogicalExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while self.matches(&[TokenKind::And]) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical(LogicalExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while self.matches(&[TokenKind::BangEqual, TokenKind::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary(BinaryExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while self.matches(&[TokenKind::Greater, TokenKind::GreaterEqual, TokenKind::Less, TokenKind::LessEqual]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary(BinaryExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while self.matches(&[TokenKind::Minus, TokenKind::Plus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary(BinaryExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while self.matches(&[TokenKind::Slash, TokenKind::Star, TokenKind::Percent]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(BinaryExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary(UnaryExpr { operator, right: Box::new(right) }));
        }

        self.call()
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    return Err(ParseError {
                        token: self.peek().clone(),
                        message: "Cannot have more than 255 arguments.".to_string(),
                    });
                }

                arguments.push(self.assignment()?);

                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }
        }

        let paren = self.consume(TokenKind::RightParen, "Expect ')' after arguments.")?.clone();

        Ok(Expr::Call(CallExpr { callee: Box::new(callee), paren, arguments }))
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.matches(&[TokenKind::LeftParen]) {
                expr = self.finish_call(expr)?;
            } else if self.matches(&[TokenKind::Dot]) {
                let name = self.consume(TokenKind::Identifier, "Expect property name after '.'.")?.clone();
                expr = Expr::Get(GetExpr { object: Box::new(expr), name });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[TokenKind::False]) {
            return Ok(Expr::Literal(Object::Bool(false)));
        }
        if self.matches(&[TokenKind::True]) {
            return Ok(Expr::Literal(Object::Bool(true)));
        }
        if self.matches(&[TokenKind::Nil]) {
            return Ok(Expr::Literal(Object::Nil));
        }

        if self.matches(&[TokenKind::Number, TokenKind::String]) {
            let literal = self.previous().literal.clone().expect("number or string token carries a literal");
            return Ok(Expr::Literal(match literal {
                crate::literal::TokenLiteral::Number(n) => Object::Number(n),
                crate::literal::TokenLiteral::String(s) => Object::String(Rc::from(s)),
            }));
        }

        if self.matches(&[TokenKind::Super]) {
            let keyword = self.previous().clone();
            self.consume(TokenKind::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(TokenKind::Identifier, "Expect superclass method name.")?.clone();
            return Ok(Expr::Super(SuperExpr { keyword, method }));
        }

        if self.matches(&[TokenKind::This]) {
            return Ok(Expr::This(ThisExpr { keyword: self.previous().clone() }));
        }

        if self.matches(&[TokenKind::Identifier]) {
            return Ok(Expr::Variable(VariableExpr { name: self.previous().clone() }));
        }

        if self.matches(&[TokenKind::LeftParen]) {
            let expr = self.expression()?;
            self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(GroupingExpr { expression: Box::new(expr) }));
        }

        Err(ParseError { token: self.peek().clone(), message: "Expect expression.".to_string() })
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
