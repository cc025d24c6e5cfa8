use crate::preprocessor::token::{NameId, Token};
use crate::types::Type;
use serde::Serialize;
use thin_vec::ThinVec;

/// An expression node. `token` is the token the node is anchored on for diagnostics:
/// the operator for unary/binary/ternary/call nodes, the literal or name for leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub token: Token,
}

impl Expr {
    pub fn new(kind: ExprKind, token: Token) -> Self {
        Expr { kind, token }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(i64),
    /// A char literal, spelled as in the source (quotes and escapes kept).
    Char(NameId),
    /// A string literal, spelled as in the source (quotes and escapes kept).
    String(NameId),
    Ident(NameId),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Ternary {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Call(Box<Expr>, ThinVec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNot,
    LogicalNot,
    AddressOf,
    Deref,
    Sizeof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    LogicalAnd,
    LogicalOr,
    Assign,
    Comma,
}

impl UnaryOp {
    pub fn from_punct(text: &str) -> Option<Self> {
        Some(match text {
            "+" => UnaryOp::Plus,
            "-" => UnaryOp::Minus,
            "~" => UnaryOp::BitNot,
            "!" => UnaryOp::LogicalNot,
            "&" => UnaryOp::AddressOf,
            "*" => UnaryOp::Deref,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::BitNot => "~",
            UnaryOp::LogicalNot => "!",
            UnaryOp::AddressOf => "&",
            UnaryOp::Deref => "*",
            UnaryOp::Sizeof => "sizeof",
        }
    }
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::BitOr => "|",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
            BinaryOp::Assign => "=",
            BinaryOp::Comma => ",",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `expr;` or the empty statement `;`.
    Expr { expr: Option<Expr>, semi: Token },
    /// Single-branch `if`; there is no `else`.
    If {
        cond: Expr,
        then_stmt: Box<Stmt>,
        token: Token,
    },
    Return { expr: Option<Expr>, token: Token },
    Compound(CompoundStmt),
    Decl(Decl),
}

/// `{ ... }`: declarations and statements in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundStmt {
    pub items: ThinVec<Stmt>,
    pub open: Token,
}

/// The type keyword(s) at the head of a declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeclSpec {
    Int(Token),
    Char(Token),
    Void(Token),
    Struct { keyword: Token, tag: Token },
}

impl DeclSpec {
    pub fn token(&self) -> Token {
        match self {
            DeclSpec::Int(t) | DeclSpec::Char(t) | DeclSpec::Void(t) => *t,
            DeclSpec::Struct { keyword, .. } => *keyword,
        }
    }
}

/// A pointer chain around a direct declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    /// One `*` token per level of indirection.
    pub pointers: ThinVec<Token>,
    pub direct: DirectDeclarator,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectDeclarator {
    /// No name, as in a parameter written `int *`.
    Abstract,
    Ident(Token),
    /// `( declarator )`
    Paren(Box<Declarator>),
    /// `inner ( params )`
    Function {
        inner: Box<DirectDeclarator>,
        params: ThinVec<Decl>,
        paren: Token,
    },
}

/// A specifier with one declarator, such as `int *x` or a parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub spec: DeclSpec,
    pub declarator: Declarator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Token,
    /// Always a `Type::Function`.
    pub ty: Type,
    pub decl: Decl,
    pub body: CompoundStmt,
}

/// File-scope names and their types in declaration order.
///
/// Duplicates are kept; lookups return the first entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    entries: Vec<(NameId, Type)>,
}

impl SymbolTable {
    pub fn push(&mut self, name: NameId, ty: Type) {
        self.entries.push((name, ty));
    }

    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, ty)| ty)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(NameId, Type)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The parser's output: function definitions plus the top-level symbol table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationUnit {
    pub functions: ThinVec<FunctionDef>,
    pub symbols: SymbolTable,
}
