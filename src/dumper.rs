use crate::parser::ast::{Decl, Expr, ExprKind, FunctionDef, Stmt, TranslationUnit};
use crate::parser::declarations::declared_type;

/// Prints a translation unit as an indented tree, followed by its symbol table.
pub struct Dumper {
    indent: String,
    out: String,
}

impl Dumper {
    fn new() -> Self {
        Self {
            indent: String::new(),
            out: String::new(),
        }
    }

    pub fn dump(tu: &TranslationUnit) -> String {
        let mut dumper = Dumper::new();
        dumper.out.push_str("TranslationUnit\n");
        let count = tu.functions.len();
        for (i, func) in tu.functions.iter().enumerate() {
            dumper.dump_function(func, i + 1 == count);
        }

        dumper.out.push_str("Symbols\n");
        for (name, ty) in tu.symbols.iter() {
            dumper.out.push_str(&format!("  {}: {}\n", name, ty));
        }
        dumper.out
    }

    fn node(&mut self, is_last: bool, label: &str) {
        let prefix = if is_last { "└─ " } else { "├─ " };
        self.out.push_str(&self.indent);
        self.out.push_str(prefix);
        self.out.push_str(label);
        self.out.push('\n');
    }

    /// Runs `body` one level deeper than a node printed with `is_last`.
    fn nested(&mut self, is_last: bool, body: impl FnOnce(&mut Self)) {
        let child_indent = if is_last { "   " } else { "│  " };
        self.indent.push_str(child_indent);
        body(self);
        self.indent.truncate(self.indent.len() - child_indent.len());
    }

    fn dump_function(&mut self, func: &FunctionDef, is_last: bool) {
        self.node(is_last, &format!("FunctionDef {} '{}'", func.name, func.ty));
        self.nested(is_last, |d| d.dump_stmts(&func.body.items));
    }

    fn dump_stmts(&mut self, stmts: &[Stmt]) {
        let count = stmts.len();
        for (i, stmt) in stmts.iter().enumerate() {
            self.dump_stmt(stmt, i + 1 == count);
        }
    }

    fn dump_stmt(&mut self, stmt: &Stmt, is_last: bool) {
        match stmt {
            Stmt::Expr { expr: None, .. } => self.node(is_last, "EmptyStmt"),
            Stmt::Expr { expr: Some(expr), .. } => {
                self.node(is_last, "ExprStmt");
                self.nested(is_last, |d| d.dump_expr(expr, true));
            }
            Stmt::If { cond, then_stmt, .. } => {
                self.node(is_last, "If");
                self.nested(is_last, |d| {
                    d.dump_expr(cond, false);
                    d.dump_stmt(then_stmt, true);
                });
            }
            Stmt::Return { expr, .. } => {
                self.node(is_last, "Return");
                if let Some(expr) = expr {
                    self.nested(is_last, |d| d.dump_expr(expr, true));
                }
            }
            Stmt::Compound(block) => {
                self.node(is_last, "Compound");
                self.nested(is_last, |d| d.dump_stmts(&block.items));
            }
            Stmt::Decl(decl) => self.dump_decl(decl, is_last),
        }
    }

    fn dump_decl(&mut self, decl: &Decl, is_last: bool) {
        let label = match declared_type(decl) {
            Ok(declared) => {
                let name = declared.name.map_or("<unnamed>".to_string(), |t| t.to_string());
                format!("Decl {} '{}'", name, declared.ty)
            }
            Err(err) => format!("Decl <{}>", err),
        };
        self.node(is_last, &label);
    }

    fn dump_expr(&mut self, expr: &Expr, is_last: bool) {
        match &expr.kind {
            ExprKind::Number(n) => self.node(is_last, &format!("Number {}", n)),
            ExprKind::Char(c) => self.node(is_last, &format!("Char {}", c)),
            ExprKind::String(s) => self.node(is_last, &format!("String {}", s)),
            ExprKind::Ident(name) => self.node(is_last, &format!("Ident {}", name)),
            ExprKind::Unary(op, operand) => {
                self.node(is_last, &format!("UnaryOp {}", op.as_str()));
                self.nested(is_last, |d| d.dump_expr(operand, true));
            }
            ExprKind::Binary(op, lhs, rhs) => {
                self.node(is_last, &format!("BinaryOp {}", op.as_str()));
                self.nested(is_last, |d| {
                    d.dump_expr(lhs, false);
                    d.dump_expr(rhs, true);
                });
            }
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                self.node(is_last, "Ternary");
                self.nested(is_last, |d| {
                    d.dump_expr(cond, false);
                    d.dump_expr(then_expr, false);
                    d.dump_expr(else_expr, true);
                });
            }
            ExprKind::Call(callee, args) => {
                self.node(is_last, "Call");
                self.nested(is_last, |d| {
                    d.dump_expr(callee, args.is_empty());
                    let count = args.len();
                    for (i, arg) in args.iter().enumerate() {
                        d.dump_expr(arg, i + 1 == count);
                    }
                });
            }
        }
    }
}
