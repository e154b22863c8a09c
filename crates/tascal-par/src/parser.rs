//! Recursive-descent parser with semantic actions fused into each reduction.
//!
//! One method per grammar production, one method per precedence level for
//! expressions. Declarations are installed and references resolved as each
//! node is built, so by the time [`Parser::parse`] returns, every sub-tree
//! that survived is already fully annotated.

use tascal_ast::{
    Assign, BinOpKind, Block, Command, Declaration, Expr, IdRef, If, Program, Read, SymbolTable,
    Type, UnOpKind, While, Write,
};
use tascal_lex::{Token, TokenKind};
use tascal_util::{Diagnostics, Line};

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: &'a mut Diagnostics,
    symbols: SymbolTable,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, diagnostics: &'a mut Diagnostics) -> Self {
        assert!(
            matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof),
            "token stream must end with Eof"
        );
        Self {
            tokens,
            pos: 0,
            diagnostics,
            symbols: SymbolTable::new(),
        }
    }

    /// Parses the whole token stream. Returns `None` — the "no tree"
    /// sentinel — only when the root `program` production itself could not
    /// be completed; every other error is accumulated and parsing continues.
    pub fn parse(mut self) -> (Option<Program>, SymbolTable) {
        let program = self.parse_program();
        (program, self.symbols)
    }

    // ---- grammar: program, block, declarations ----------------------

    fn parse_program(&mut self) -> Option<Program> {
        self.expect(TokenKind::Program)?;
        let name_tok = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Semicolon);
        let block = self.parse_block()?;
        self.expect(TokenKind::Dot);
        Some(Program {
            name: name_tok.text,
            total_vars: self.symbols.len(),
            block,
        })
    }

    fn parse_block(&mut self) -> Option<Block> {
        let declarations = self.parse_declarations();
        let compound = self.parse_compound()?;
        let mut commands: Vec<Command> = declarations
            .into_iter()
            .map(Command::Declaration)
            .collect();
        commands.extend(compound.commands);
        Some(Block { commands })
    }

    fn parse_declarations(&mut self) -> Vec<Declaration> {
        let mut decls = Vec::new();
        if self.peek_kind() == TokenKind::Var {
            self.advance();
            while self.peek_kind() == TokenKind::Ident {
                decls.push(self.parse_decl_entry());
            }
        }
        decls
    }

    fn parse_decl_entry(&mut self) -> Declaration {
        let names = self.parse_id_list();
        self.expect(TokenKind::Colon);
        let kind = self.parse_type();
        self.expect(TokenKind::Semicolon);
        for name_tok in &names {
            if self.symbols.declare(&name_tok.text, kind).is_err() {
                self.diagnostics.semantic(
                    name_tok.line,
                    format_args!("variable '{}' already declared", name_tok.text),
                );
            }
        }
        Declaration {
            names: names.into_iter().map(|t| t.text).collect(),
            kind,
        }
    }

    fn parse_type(&mut self) -> Type {
        match self.peek_kind() {
            TokenKind::Integer => {
                self.advance();
                Type::Integer
            }
            TokenKind::Boolean => {
                self.advance();
                Type::Boolean
            }
            _ => {
                let tok = self.peek().clone();
                self.report_unexpected(&tok);
                if tok.kind != TokenKind::Eof {
                    self.advance();
                }
                Type::Unknown
            }
        }
    }

    fn parse_id_list(&mut self) -> Vec<Token> {
        let mut idents = Vec::new();
        if let Some(tok) = self.expect(TokenKind::Ident) {
            idents.push(tok);
        }
        while self.peek_kind() == TokenKind::Comma {
            self.advance();
            if let Some(tok) = self.expect(TokenKind::Ident) {
                idents.push(tok);
            }
        }
        idents
    }

    // ---- grammar: compound, cmd_list, cmd ----------------------------

    fn parse_compound(&mut self) -> Option<Block> {
        self.expect(TokenKind::Begin)?;
        let commands = self.parse_cmd_list();
        self.expect(TokenKind::End);
        Some(Block { commands })
    }

    fn parse_cmd_list(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::End | TokenKind::Eof => break,
                TokenKind::Semicolon => {
                    self.advance();
                }
                TokenKind::Else | TokenKind::Dot => {
                    // Stray terminator for an enclosing construct: report and
                    // skip rather than loop forever trying to parse a cmd here.
                    let tok = self.peek().clone();
                    self.report_unexpected(&tok);
                    self.advance();
                }
                _ => {
                    if let Some(cmd) = self.parse_command() {
                        commands.push(cmd);
                    }
                }
            }
        }
        commands
    }

    /// Parses exactly one `cmd` (not a `cmd_list`), used where the grammar
    /// calls for a single command: `if`'s branches and `while`'s body. An
    /// explicit `begin...end` unwraps to its own block rather than nesting
    /// inside a one-element one.
    fn parse_command_as_block(&mut self) -> Block {
        match self.parse_command() {
            Some(Command::Block(block)) => block,
            Some(cmd) => Block {
                commands: vec![cmd],
            },
            None => Block::default(),
        }
    }

    fn parse_command(&mut self) -> Option<Command> {
        match self.peek_kind() {
            TokenKind::Ident => Some(Command::Assign(self.parse_assign())),
            TokenKind::If => Some(Command::If(self.parse_if())),
            TokenKind::While => Some(Command::While(self.parse_while())),
            TokenKind::Read => Some(Command::Read(self.parse_read())),
            TokenKind::Write => Some(Command::Write(self.parse_write())),
            TokenKind::Begin => self.parse_compound().map(Command::Block),
            TokenKind::Semicolon
            | TokenKind::End
            | TokenKind::Else
            | TokenKind::Eof
            | TokenKind::Dot => None,
            _ => {
                let tok = self.peek().clone();
                self.report_unexpected(&tok);
                if tok.kind != TokenKind::Eof {
                    self.advance();
                }
                None
            }
        }
    }

    fn parse_assign(&mut self) -> Assign {
        let name_tok = self.advance();
        let target = self.resolve_ident(name_tok);
        self.expect(TokenKind::Assign);
        let value = self.parse_expr();
        let value_kind = value.kind();
        if let Some(sym_id) = target.symbol {
            let sym_kind = self.symbols.get(sym_id).kind;
            if sym_kind != value_kind && sym_kind != Type::Unknown && value_kind != Type::Unknown {
                self.diagnostics.semantic(
                    target.line,
                    format_args!(
                        "incompatible assignment: variable '{}' is {}, expression is {}",
                        target.name, sym_kind, value_kind
                    ),
                );
            }
        }
        Assign {
            target,
            value: Box::new(value),
        }
    }

    fn parse_if(&mut self) -> If {
        let if_line = self.peek().line;
        self.advance();
        let cond = self.parse_expr();
        self.check_boolean_condition(&cond, if_line);
        self.expect(TokenKind::Then);
        let then_branch = self.parse_command_as_block();
        let else_branch = if self.peek_kind() == TokenKind::Else {
            self.advance();
            Some(Box::new(self.parse_command_as_block()))
        } else {
            None
        };
        If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch,
        }
    }

    fn parse_while(&mut self) -> While {
        let while_line = self.peek().line;
        self.advance();
        let cond = self.parse_expr();
        self.check_boolean_condition(&cond, while_line);
        self.expect(TokenKind::Do);
        let body = self.parse_command_as_block();
        While {
            cond: Box::new(cond),
            body: Box::new(body),
        }
    }

    fn parse_read(&mut self) -> Read {
        self.advance();
        self.expect(TokenKind::LParen);
        let names = self.parse_id_list();
        self.expect(TokenKind::RParen);
        let targets = names.into_iter().map(|tok| self.resolve_ident(tok)).collect();
        Read { targets }
    }

    fn parse_write(&mut self) -> Write {
        self.advance();
        self.expect(TokenKind::LParen);
        let values = self.parse_expr_list();
        self.expect(TokenKind::RParen);
        for value in &values {
            if value.kind() == Type::Unknown {
                self.diagnostics.semantic(
                    self.write_arg_line(value),
                    "write received invalid type",
                );
            }
        }
        Write { values }
    }

    fn write_arg_line(&self, expr: &Expr) -> Line {
        match expr {
            Expr::IdRef(id_ref) => id_ref.line,
            Expr::BinOp { left, .. } => self.write_arg_line(left),
            Expr::UnOp { operand, .. } => self.write_arg_line(operand),
            _ => Line::START,
        }
    }

    fn check_boolean_condition(&mut self, cond: &Expr, line: Line) {
        if cond.kind() != Type::Boolean {
            self.diagnostics.semantic(line, "condition must be boolean");
        }
    }

    fn resolve_ident(&mut self, tok: Token) -> IdRef {
        let line = tok.line;
        match self.symbols.resolve(&tok.text) {
            Some(id) => {
                let kind = self.symbols.get(id).kind;
                IdRef {
                    name: tok.text,
                    symbol: Some(id),
                    kind,
                    line,
                }
            }
            None => {
                self.diagnostics
                    .semantic(line, format_args!("variable '{}' not declared", tok.text));
                IdRef {
                    name: tok.text,
                    symbol: None,
                    kind: Type::Unknown,
                    line,
                }
            }
        }
    }

    // ---- grammar: expr .. factor (precedence climbing) ---------------

    fn parse_expr_list(&mut self) -> Vec<Expr> {
        let mut exprs = vec![self.parse_expr()];
        while self.peek_kind() == TokenKind::Comma {
            self.advance();
            exprs.push(self.parse_expr());
        }
        exprs
    }

    fn parse_expr(&mut self) -> Expr {
        let mut left = self.parse_expr_and();
        while self.peek_kind() == TokenKind::Or {
            let line = self.peek().line;
            self.advance();
            let right = self.parse_expr_and();
            left = self.make_binop(BinOpKind::Or, left, right, line);
        }
        left
    }

    fn parse_expr_and(&mut self) -> Expr {
        let mut left = self.parse_expr_rel();
        while self.peek_kind() == TokenKind::And {
            let line = self.peek().line;
            self.advance();
            let right = self.parse_expr_rel();
            left = self.make_binop(BinOpKind::And, left, right, line);
        }
        left
    }

    /// Relational operators are non-associative: at most one is consumed.
    fn parse_expr_rel(&mut self) -> Expr {
        let left = self.parse_sum();
        let op = match self.peek_kind() {
            TokenKind::Eq => Some(BinOpKind::Eq),
            TokenKind::NotEq => Some(BinOpKind::NotEq),
            TokenKind::Less => Some(BinOpKind::Less),
            TokenKind::LessEq => Some(BinOpKind::LessEq),
            TokenKind::Greater => Some(BinOpKind::Greater),
            TokenKind::GreaterEq => Some(BinOpKind::GreaterEq),
            _ => None,
        };
        match op {
            Some(op) => {
                let line = self.peek().line;
                self.advance();
                let right = self.parse_sum();
                self.make_binop(op, left, right, line)
            }
            None => left,
        }
    }

    fn parse_sum(&mut self) -> Expr {
        let mut left = self.parse_term();
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOpKind::Add,
                TokenKind::Minus => BinOpKind::Sub,
                _ => break,
            };
            let line = self.peek().line;
            self.advance();
            let right = self.parse_term();
            left = self.make_binop(op, left, right, line);
        }
        left
    }

    fn parse_term(&mut self) -> Expr {
        let mut left = self.parse_factor();
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOpKind::Mul,
                TokenKind::Div => BinOpKind::Div,
                _ => break,
            };
            let line = self.peek().line;
            self.advance();
            let right = self.parse_factor();
            left = self.make_binop(op, left, right, line);
        }
        left
    }

    fn parse_factor(&mut self) -> Expr {
        match self.peek_kind() {
            TokenKind::Ident => {
                let tok = self.advance();
                Expr::IdRef(self.resolve_ident(tok))
            }
            TokenKind::Number => {
                let tok = self.advance();
                Expr::NumConst {
                    value: tok.number.unwrap_or(0),
                }
            }
            TokenKind::True => {
                self.advance();
                Expr::BoolConst { value: true }
            }
            TokenKind::False => {
                self.advance();
                Expr::BoolConst { value: false }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr();
                self.expect(TokenKind::RParen);
                inner
            }
            TokenKind::Not => {
                let line = self.peek().line;
                self.advance();
                let operand = self.parse_factor();
                self.make_unop(UnOpKind::Not, operand, line)
            }
            TokenKind::Minus => {
                let line = self.peek().line;
                self.advance();
                let operand = self.parse_factor();
                self.make_unop(UnOpKind::Negate, operand, line)
            }
            _ => {
                let tok = self.peek().clone();
                let line = tok.line;
                self.report_unexpected(&tok);
                if tok.kind != TokenKind::Eof {
                    self.advance();
                }
                // A placeholder that carries no further diagnostics of its own:
                // the unexpected-token error above is the one diagnostic this
                // sub-tree needs.
                Expr::IdRef(IdRef {
                    name: String::new(),
                    symbol: None,
                    kind: Type::Unknown,
                    line,
                })
            }
        }
    }

    fn make_binop(&mut self, op: BinOpKind, left: Expr, right: Expr, line: Line) -> Expr {
        let kind = self.infer_binop_kind(op, left.kind(), right.kind(), line);
        Expr::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
            kind,
        }
    }

    fn infer_binop_kind(&mut self, op: BinOpKind, lk: Type, rk: Type, line: Line) -> Type {
        use BinOpKind::*;
        let either_unknown = lk == Type::Unknown || rk == Type::Unknown;
        let mismatch = |lk: Type, rk: Type, want: Type| lk != want || rk != want;
        match op {
            Add | Sub | Mul | Div => {
                if !either_unknown && mismatch(lk, rk, Type::Integer) {
                    self.bad_operand(op, line);
                }
                Type::Integer
            }
            And | Or => {
                if !either_unknown && mismatch(lk, rk, Type::Boolean) {
                    self.bad_operand(op, line);
                }
                Type::Boolean
            }
            Eq | NotEq => {
                if !either_unknown && lk != rk {
                    self.bad_operand(op, line);
                }
                Type::Boolean
            }
            Less | LessEq | Greater | GreaterEq => {
                if !either_unknown && mismatch(lk, rk, Type::Integer) {
                    self.bad_operand(op, line);
                }
                Type::Boolean
            }
        }
    }

    fn bad_operand(&mut self, op: BinOpKind, line: Line) {
        self.diagnostics.semantic(
            line,
            format_args!("invalid operand kind for operator '{}'", binop_lexeme(op)),
        );
    }

    fn make_unop(&mut self, op: UnOpKind, operand: Expr, line: Line) -> Expr {
        let operand_kind = operand.kind();
        let kind = match op {
            UnOpKind::Negate => {
                if operand_kind != Type::Unknown && operand_kind != Type::Integer {
                    self.diagnostics
                        .semantic(line, "invalid operand kind for operator '-'");
                }
                Type::Integer
            }
            UnOpKind::Not => {
                if operand_kind != Type::Unknown && operand_kind != Type::Boolean {
                    self.diagnostics
                        .semantic(line, "invalid operand kind for operator 'not'");
                }
                Type::Boolean
            }
        };
        Expr::UnOp {
            op,
            operand: Box::new(operand),
            kind,
        }
    }

    // ---- token stream plumbing ----------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        let tok = self.peek().clone();
        if tok.kind == kind {
            self.advance();
            Some(tok)
        } else {
            self.report_unexpected(&tok);
            if tok.kind != TokenKind::Eof {
                self.advance();
            }
            None
        }
    }

    fn report_unexpected(&mut self, tok: &Token) {
        if tok.kind == TokenKind::Eof {
            self.diagnostics.syntactic("unexpected end of file");
        } else {
            self.diagnostics.syntactic(format_args!(
                "unexpected token '{}' at line {}",
                tok.text, tok.line
            ));
        }
    }
}

fn binop_lexeme(op: BinOpKind) -> &'static str {
    match op {
        BinOpKind::Add => "+",
        BinOpKind::Sub => "-",
        BinOpKind::Mul => "*",
        BinOpKind::Div => "div",
        BinOpKind::And => "and",
        BinOpKind::Or => "or",
        BinOpKind::Eq => "=",
        BinOpKind::NotEq => "<>",
        BinOpKind::Less => "<",
        BinOpKind::LessEq => "<=",
        BinOpKind::Greater => ">",
        BinOpKind::GreaterEq => ">=",
    }
}
