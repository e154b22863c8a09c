//! Syntax-directed instruction emission.

use tascal_ast::{
    Assign, BinOpKind, Block, Command, Expr, IdRef, If, Program, Read, Repeat, SymbolTable,
    UnOpKind, While, Write,
};

/// Accumulates MEPA instruction lines for one compilation.
///
/// Borrows the [`SymbolTable`] the parser built so every `IdRef` can be
/// turned back into its stack offset; holds no state of its own beyond the
/// output buffer and the label counter.
pub struct Generator<'a> {
    symbols: &'a SymbolTable,
    lines: Vec<String>,
    next_label: u32,
}

impl<'a> Generator<'a> {
    /// Lowers `program` to a flat list of MEPA lines, one instruction or
    /// label per entry, in the order they should appear in the output file.
    pub fn generate(program: &Program, symbols: &'a SymbolTable) -> Vec<String> {
        let mut gen = Generator {
            symbols,
            lines: Vec::new(),
            next_label: 1,
        };
        gen.emit("INPP");
        if program.total_vars > 0 {
            gen.emit(format!("AMEM {}", program.total_vars));
        }
        gen.gen_block(&program.block);
        gen.emit("PARA");
        gen.emit("FIM");
        gen.lines
    }

    fn fresh_label(&mut self) -> String {
        let label = format!("R{:02}", self.next_label);
        self.next_label += 1;
        label
    }

    fn emit(&mut self, instr: impl std::fmt::Display) {
        self.lines.push(format!("     {instr}"));
    }

    fn emit_label(&mut self, label: &str) {
        self.lines.push(format!("{label}: NADA"));
    }

    fn offset_of(&self, id_ref: &IdRef) -> Option<u32> {
        id_ref.symbol.map(|id| self.symbols.get(id).offset)
    }

    fn gen_block(&mut self, block: &Block) {
        for cmd in &block.commands {
            self.gen_command(cmd);
        }
    }

    fn gen_command(&mut self, cmd: &Command) {
        match cmd {
            Command::Declaration(_) => {}
            Command::Assign(assign) => self.gen_assign(assign),
            Command::Read(read) => self.gen_read(read),
            Command::Write(write) => self.gen_write(write),
            Command::If(if_cmd) => self.gen_if(if_cmd),
            Command::While(while_cmd) => self.gen_while(while_cmd),
            Command::Repeat(repeat_cmd) => self.gen_repeat(repeat_cmd),
            Command::Block(block) => self.gen_block(block),
        }
    }

    fn gen_assign(&mut self, assign: &Assign) {
        self.gen_expr(&assign.value);
        self.gen_store(&assign.target);
    }

    fn gen_store(&mut self, target: &IdRef) {
        match self.offset_of(target) {
            Some(offset) => self.emit(format!("ARMZ 0,{offset}")),
            None => self.emit(format!(
                "; ARMZ ??? (variable not annotated: {})",
                target.name
            )),
        }
    }

    fn gen_load(&mut self, id_ref: &IdRef) {
        match self.offset_of(id_ref) {
            Some(offset) => self.emit(format!("CRVL 0,{offset}")),
            None => self.emit(format!(
                "; CRVL ??? (variable not annotated: {})",
                id_ref.name
            )),
        }
    }

    fn gen_read(&mut self, read: &Read) {
        for target in &read.targets {
            self.emit("LEIT");
            self.gen_store(target);
        }
    }

    fn gen_write(&mut self, write: &Write) {
        for expr in &write.values {
            self.gen_expr(expr);
            self.emit("IMPR");
        }
    }

    fn gen_if(&mut self, if_cmd: &If) {
        self.gen_expr(&if_cmd.cond);
        match &if_cmd.else_branch {
            None => {
                let end_label = self.fresh_label();
                self.emit(format!("DSVF {end_label}"));
                self.gen_block(&if_cmd.then_branch);
                self.emit_label(&end_label);
            }
            Some(else_branch) => {
                let else_label = self.fresh_label();
                let end_label = self.fresh_label();
                self.emit(format!("DSVF {else_label}"));
                self.gen_block(&if_cmd.then_branch);
                self.emit(format!("DSVS {end_label}"));
                self.emit_label(&else_label);
                self.gen_block(else_branch);
                self.emit_label(&end_label);
            }
        }
    }

    fn gen_while(&mut self, while_cmd: &While) {
        let begin_label = self.fresh_label();
        self.emit_label(&begin_label);
        self.gen_expr(&while_cmd.cond);
        let false_label = self.fresh_label();
        self.emit(format!("DSVF {false_label}"));
        self.gen_block(&while_cmd.body);
        self.emit(format!("DSVS {begin_label}"));
        self.emit_label(&false_label);
    }

    /// `repeat ... until cond` lowers to a loop-while-false.
    fn gen_repeat(&mut self, repeat_cmd: &Repeat) {
        let begin_label = self.fresh_label();
        self.emit_label(&begin_label);
        self.gen_block(&repeat_cmd.body);
        self.gen_expr(&repeat_cmd.cond);
        self.emit(format!("DSVF {begin_label}"));
    }

    fn gen_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::NumConst { value } => self.emit(format!("CRCT {value}")),
            Expr::BoolConst { value } => self.emit(format!("CRCT {}", if *value { 1 } else { 0 })),
            Expr::IdRef(id_ref) => self.gen_load(id_ref),
            Expr::UnOp { op, operand, .. } => self.gen_unop(*op, operand),
            Expr::BinOp { left, op, right, .. } => self.gen_binop(*op, left, right),
        }
    }

    fn gen_unop(&mut self, op: UnOpKind, operand: &Expr) {
        self.gen_expr(operand);
        match op {
            UnOpKind::Negate => {
                self.emit("CRCT -1");
                self.emit("MULT");
            }
            UnOpKind::Not => self.emit("NEGA"),
        }
    }

    fn gen_binop(&mut self, op: BinOpKind, left: &Expr, right: &Expr) {
        self.gen_expr(left);
        self.gen_expr(right);
        self.emit(binop_mnemonic(op));
    }
}

/// Binary-operator mnemonic table.
fn binop_mnemonic(op: BinOpKind) -> &'static str {
    match op {
        BinOpKind::Add => "SOMA",
        BinOpKind::Sub => "SUBT",
        BinOpKind::Mul => "MULT",
        BinOpKind::Div => "DIVI",
        BinOpKind::And => "CONJ",
        BinOpKind::Or => "DISJ",
        BinOpKind::Eq => "CMIG",
        BinOpKind::NotEq => "CMDG",
        BinOpKind::Less => "CMME",
        BinOpKind::LessEq => "CMEG",
        BinOpKind::Greater => "CMMA",
        BinOpKind::GreaterEq => "CMAG",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tascal_ast::{SymbolTable, Type};
    use tascal_util::Line;

    fn id_ref(name: &str, id: tascal_ast::SymbolId, kind: Type) -> IdRef {
        IdRef {
            name: name.to_string(),
            symbol: Some(id),
            kind,
            line: Line(1),
        }
    }

    #[test]
    fn scenario_a_trivial_program() {
        let symbols = SymbolTable::new();
        let program = Program {
            name: "p".to_string(),
            total_vars: 0,
            block: Block::default(),
        };
        let lines = Generator::generate(&program, &symbols);
        assert_eq!(lines, vec!["     INPP", "     PARA", "     FIM"]);
    }

    #[test]
    fn scenario_b_assignment_and_write() {
        let mut symbols = SymbolTable::new();
        let x = symbols.declare("x", Type::Integer).unwrap();
        let program = Program {
            name: "p".to_string(),
            total_vars: 1,
            block: Block {
                commands: vec![
                    Command::Assign(Assign {
                        target: id_ref("x", x, Type::Integer),
                        value: Box::new(Expr::BinOp {
                            left: Box::new(Expr::NumConst { value: 3 }),
                            op: BinOpKind::Add,
                            right: Box::new(Expr::NumConst { value: 4 }),
                            kind: Type::Integer,
                        }),
                    }),
                    Command::Write(Write {
                        values: vec![Expr::IdRef(id_ref("x", x, Type::Integer))],
                    }),
                ],
            },
        };
        let lines = Generator::generate(&program, &symbols);
        assert_eq!(
            lines,
            vec![
                "     INPP",
                "     AMEM 1",
                "     CRCT 3",
                "     CRCT 4",
                "     SOMA",
                "     ARMZ 0,0",
                "     CRVL 0,0",
                "     IMPR",
                "     PARA",
                "     FIM",
            ]
        );
    }

    #[test]
    fn if_without_else_uses_one_label() {
        let symbols = SymbolTable::new();
        let program = Program {
            name: "p".to_string(),
            total_vars: 0,
            block: Block {
                commands: vec![Command::If(If {
                    cond: Box::new(Expr::BoolConst { value: true }),
                    then_branch: Box::new(Block::default()),
                    else_branch: None,
                })],
            },
        };
        let lines = Generator::generate(&program, &symbols);
        assert!(lines.contains(&"     DSVF R01".to_string()));
        assert!(lines.contains(&"R01: NADA".to_string()));
        assert_eq!(lines.iter().filter(|l| l.contains("NADA")).count(), 1);
    }

    #[test]
    fn if_with_else_uses_two_labels_in_order() {
        let symbols = SymbolTable::new();
        let program = Program {
            name: "p".to_string(),
            total_vars: 0,
            block: Block {
                commands: vec![Command::If(If {
                    cond: Box::new(Expr::BoolConst { value: true }),
                    then_branch: Box::new(Block::default()),
                    else_branch: Some(Box::new(Block::default())),
                })],
            },
        };
        let lines = Generator::generate(&program, &symbols);
        assert!(lines.contains(&"     DSVF R01".to_string()));
        assert!(lines.contains(&"     DSVS R02".to_string()));
        assert!(lines.contains(&"R01: NADA".to_string()));
        assert!(lines.contains(&"R02: NADA".to_string()));
    }

    #[test]
    fn while_head_label_precedes_its_body() {
        let mut symbols = SymbolTable::new();
        let x = symbols.declare("x", Type::Integer).unwrap();
        let program = Program {
            name: "p".to_string(),
            total_vars: 1,
            block: Block {
                commands: vec![Command::While(While {
                    cond: Box::new(Expr::BoolConst { value: true }),
                    body: Box::new(Block {
                        commands: vec![Command::Assign(Assign {
                            target: id_ref("x", x, Type::Integer),
                            value: Box::new(Expr::NumConst { value: 1 }),
                        })],
                    }),
                })],
            },
        };
        let lines = Generator::generate(&program, &symbols);
        let begin_pos = lines.iter().position(|l| l == "R01: NADA").unwrap();
        let body_pos = lines.iter().position(|l| l.contains("ARMZ")).unwrap();
        assert!(begin_pos < body_pos);
        assert!(lines.contains(&"     DSVS R01".to_string()));
        assert!(lines.contains(&"R02: NADA".to_string()));
    }

    #[test]
    fn repeat_loops_while_condition_is_false() {
        let symbols = SymbolTable::new();
        let program = Program {
            name: "p".to_string(),
            total_vars: 0,
            block: Block {
                commands: vec![Command::Repeat(Repeat {
                    body: Box::new(Block::default()),
                    cond: Box::new(Expr::BoolConst { value: false }),
                })],
            },
        };
        let lines = Generator::generate(&program, &symbols);
        assert_eq!(lines[1], "R01: NADA");
        assert_eq!(lines[lines.len() - 2], "     PARA");
        assert_eq!(lines.last().unwrap(), "     FIM");
        assert!(lines.contains(&"     DSVF R01".to_string()));
    }

    #[test]
    fn unresolved_identifier_emits_placeholder_comment() {
        let symbols = SymbolTable::new();
        let program = Program {
            name: "p".to_string(),
            total_vars: 0,
            block: Block {
                commands: vec![Command::Write(Write {
                    values: vec![Expr::IdRef(IdRef {
                        name: "ghost".to_string(),
                        symbol: None,
                        kind: Type::Unknown,
                        line: Line(1),
                    })],
                })],
            },
        };
        let lines = Generator::generate(&program, &symbols);
        assert!(lines
            .iter()
            .any(|l| l.contains("CRVL ???") && l.contains("ghost")));
    }

    #[test]
    fn unop_lowering() {
        let symbols = SymbolTable::new();
        let program = Program {
            name: "p".to_string(),
            total_vars: 0,
            block: Block {
                commands: vec![Command::Write(Write {
                    values: vec![Expr::UnOp {
                        op: UnOpKind::Negate,
                        operand: Box::new(Expr::NumConst { value: 5 }),
                        kind: Type::Integer,
                    }],
                })],
            },
        };
        let lines = Generator::generate(&program, &symbols);
        assert_eq!(
            lines,
            vec![
                "     INPP",
                "     CRCT 5",
                "     CRCT -1",
                "     MULT",
                "     IMPR",
                "     PARA",
                "     FIM",
            ]
        );
    }
}
