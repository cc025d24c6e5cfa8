use crate::parser::Parser;
use crate::parser::ast::{BinaryOp, Decl, Expr, ExprKind, Stmt, TranslationUnit, UnaryOp};
use crate::parser::declarations::declared_type;
use crate::parser::error::ParserError;
use crate::parser::expressions::parse_expr;
use crate::preprocessor::lexer::Lexer;
use crate::types::{Type, TypeError};
use serde::Serialize;

/// Expression tree with names resolved to strings, for snapshots.
#[derive(Debug, Serialize)]
enum ResolvedExpr {
    Number(i64),
    Char(String),
    String(String),
    Ident(String),
    UnaryOp(UnaryOp, Box<ResolvedExpr>),
    BinaryOp(BinaryOp, Box<ResolvedExpr>, Box<ResolvedExpr>),
    Ternary(Box<ResolvedExpr>, Box<ResolvedExpr>, Box<ResolvedExpr>),
    Call(Box<ResolvedExpr>, Vec<ResolvedExpr>),
}

#[derive(Debug, Serialize)]
enum ResolvedStmt {
    Expr(Option<ResolvedExpr>),
    If(ResolvedExpr, Box<ResolvedStmt>),
    Return(Option<ResolvedExpr>),
    Compound(Vec<ResolvedStmt>),
    Decl { name: Option<String>, ty: String },
}

#[derive(Debug, Serialize)]
struct ResolvedFunction {
    name: String,
    ty: String,
    body: Vec<ResolvedStmt>,
}

#[derive(Debug, Serialize)]
struct ResolvedUnit {
    functions: Vec<ResolvedFunction>,
    symbols: Vec<(String, String)>,
}

fn resolve_expr(expr: &Expr) -> ResolvedExpr {
    let boxed = |e: &Expr| Box::new(resolve_expr(e));
    match &expr.kind {
        ExprKind::Number(n) => ResolvedExpr::Number(*n),
        ExprKind::Char(c) => ResolvedExpr::Char(c.to_string()),
        ExprKind::String(s) => ResolvedExpr::String(s.to_string()),
        ExprKind::Ident(name) => ResolvedExpr::Ident(name.to_string()),
        ExprKind::Unary(op, operand) => ResolvedExpr::UnaryOp(*op, boxed(operand)),
        ExprKind::Binary(op, lhs, rhs) => ResolvedExpr::BinaryOp(*op, boxed(lhs), boxed(rhs)),
        ExprKind::Ternary {
            cond,
            then_expr,
            else_expr,
        } => ResolvedExpr::Ternary(boxed(cond), boxed(then_expr), boxed(else_expr)),
        ExprKind::Call(callee, args) => {
            ResolvedExpr::Call(boxed(callee), args.iter().map(resolve_expr).collect())
        }
    }
}

fn resolve_decl(decl: &Decl) -> ResolvedStmt {
    let declared = declared_type(decl).unwrap();
    ResolvedStmt::Decl {
        name: declared.name.map(|t| t.to_string()),
        ty: declared.ty.to_string(),
    }
}

fn resolve_stmt(stmt: &Stmt) -> ResolvedStmt {
    match stmt {
        Stmt::Expr { expr, .. } => ResolvedStmt::Expr(expr.as_ref().map(resolve_expr)),
        Stmt::If {
            cond, then_stmt, ..
        } => ResolvedStmt::If(resolve_expr(cond), Box::new(resolve_stmt(then_stmt))),
        Stmt::Return { expr, .. } => ResolvedStmt::Return(expr.as_ref().map(resolve_expr)),
        Stmt::Compound(block) => ResolvedStmt::Compound(block.items.iter().map(resolve_stmt).collect()),
        Stmt::Decl(decl) => resolve_decl(decl),
    }
}

fn resolve_unit(unit: &TranslationUnit) -> ResolvedUnit {
    ResolvedUnit {
        functions: unit
            .functions
            .iter()
            .map(|f| ResolvedFunction {
                name: f.name.to_string(),
                ty: f.ty.to_string(),
                body: f.body.items.iter().map(resolve_stmt).collect(),
            })
            .collect(),
        symbols: unit
            .symbols
            .iter()
            .map(|(name, ty)| (name.to_string(), ty.to_string()))
            .collect(),
    }
}

fn parser_for(src: &str) -> Parser {
    let _ = env_logger::builder().is_test(true).try_init();
    Parser::new(Lexer::new(src).tokenize().unwrap())
}

fn setup_expr(src: &str) -> ResolvedExpr {
    let mut parser = parser_for(src);
    let expr = parse_expr(&mut parser).unwrap().unwrap();
    assert!(parser.is_at_end(), "unparsed input after `{}`", src);
    resolve_expr(&expr)
}

fn setup_unit(src: &str) -> ResolvedUnit {
    resolve_unit(&parser_for(src).parse().unwrap())
}

fn parse_err(src: &str) -> ParserError {
    parser_for(src).parse().unwrap_err()
}

#[test]
fn test_precedence() {
    let resolved = setup_expr("1 + 2 * 3");
    insta::assert_yaml_snapshot!(&resolved, @r"
    BinaryOp:
      - Add
      - Number: 1
      - BinaryOp:
          - Mul
          - Number: 2
          - Number: 3
    ");
}

#[test]
fn test_subtraction_is_left_associative() {
    let resolved = setup_expr("1 - 2 - 3");
    insta::assert_yaml_snapshot!(&resolved, @r"
    BinaryOp:
      - Sub
      - BinaryOp:
          - Sub
          - Number: 1
          - Number: 2
      - Number: 3
    ");
}

#[test]
fn test_assignment_is_right_associative() {
    let resolved = setup_expr("a = b = c");
    insta::assert_yaml_snapshot!(&resolved, @r"
    BinaryOp:
      - Assign
      - Ident: a
      - BinaryOp:
          - Assign
          - Ident: b
          - Ident: c
    ");
}

#[test]
fn test_conditional() {
    let resolved = setup_expr("1 < 2 ? 3 : 4");
    insta::assert_yaml_snapshot!(&resolved, @r"
    Ternary:
      - BinaryOp:
          - Lt
          - Number: 1
          - Number: 2
      - Number: 3
      - Number: 4
    ");
}

#[test]
fn test_parenthesized_expression() {
    let resolved = setup_expr("(1 + 2) * 3");
    insta::assert_yaml_snapshot!(&resolved, @r"
    BinaryOp:
      - Mul
      - BinaryOp:
          - Add
          - Number: 1
          - Number: 2
      - Number: 3
    ");
}

#[test]
fn test_sizeof_binds_tighter_than_addition() {
    let resolved = setup_expr("sizeof x + 1");
    insta::assert_yaml_snapshot!(&resolved, @r"
    BinaryOp:
      - Add
      - UnaryOp:
          - Sizeof
          - Ident: x
      - Number: 1
    ");
}

#[test]
fn test_prefix_operators_nest() {
    let resolved = setup_expr("-*p");
    insta::assert_yaml_snapshot!(&resolved, @r"
    UnaryOp:
      - Minus
      - UnaryOp:
          - Deref
          - Ident: p
    ");
}

#[test]
fn test_function_call() {
    let resolved = setup_expr("foo(a, 017)");
    insta::assert_yaml_snapshot!(&resolved, @r"
    Call:
      - Ident: foo
      - - Ident: a
        - Number: 15
    ");
}

#[test]
fn test_logical_operators() {
    let resolved = setup_expr("!a && b || c");
    insta::assert_yaml_snapshot!(&resolved, @r"
    BinaryOp:
      - LogicalOr
      - BinaryOp:
          - LogicalAnd
          - UnaryOp:
              - LogicalNot
              - Ident: a
          - Ident: b
      - Ident: c
    ");
}

#[test]
fn test_comma_is_lowest() {
    let resolved = setup_expr("a = 1, b");
    insta::assert_yaml_snapshot!(&resolved, @r"
    BinaryOp:
      - Comma
      - BinaryOp:
          - Assign
          - Ident: a
          - Number: 1
      - Ident: b
    ");
}

#[test]
fn test_bitwise_ladder() {
    let resolved = setup_expr("a | b ^ c & d == e << 1");
    insta::assert_yaml_snapshot!(&resolved, @r"
    BinaryOp:
      - BitOr
      - Ident: a
      - BinaryOp:
          - BitXor
          - Ident: b
          - BinaryOp:
              - BitAnd
              - Ident: c
              - BinaryOp:
                  - Eq
                  - Ident: d
                  - BinaryOp:
                      - Shl
                      - Ident: e
                      - Number: 1
    ");
}

#[test]
fn test_literals_keep_spelling() {
    assert!(matches!(setup_expr("'a'"), ResolvedExpr::Char(c) if c == "'a'"));
    assert!(matches!(setup_expr("\"hi\""), ResolvedExpr::String(s) if s == "\"hi\""));
}

#[test]
fn test_function_definition_and_symbols() {
    let resolved = setup_unit("int *x; int f(int a) { return a; }");
    insta::assert_yaml_snapshot!(&resolved, @r"
    functions:
      - name: f
        ty: function(int) returning int
        body:
          - Return:
              Ident: a
    symbols:
      - - x
        - pointer to int
      - - f
        - function(int) returning int
    ");
}

#[test]
fn test_statements() {
    let resolved = setup_unit("int main() { char c; if (c) return 1; ; { c = 2; } return; }");
    insta::assert_yaml_snapshot!(&resolved, @r"
    functions:
      - name: main
        ty: function() returning int
        body:
          - Decl:
              name: c
              ty: char
          - If:
              - Ident: c
              - Return:
                  Number: 1
          - Expr: ~
          - Compound:
              - Expr:
                  BinaryOp:
                    - Assign
                    - Ident: c
                    - Number: 2
          - Return: ~
    symbols:
      - - main
        - function() returning int
    ");
}

#[test]
fn test_struct_declaration() {
    let unit = parser_for("struct point *origin;").parse().unwrap();
    assert_eq!(
        unit.symbols.lookup("origin").unwrap().to_string(),
        "pointer to struct point"
    );
}

#[test]
fn test_duplicate_symbols_are_kept() {
    let unit = parser_for("int a; char a;").parse().unwrap();
    assert_eq!(unit.symbols.len(), 2);
    assert_eq!(unit.symbols.lookup("a"), Some(&Type::int()));
}

#[test]
fn test_empty_input() {
    let unit = parser_for("").parse().unwrap();
    assert!(unit.functions.is_empty());
    assert!(unit.symbols.is_empty());
}

#[test]
fn test_missing_semicolon() {
    let err = parse_err("int main() { return 1 }");
    assert!(matches!(
        err,
        ParserError::UnexpectedToken { token, expected: ";" } if token.is("}")
    ));
}

#[test]
fn test_missing_operand() {
    let err = parse_err("int main() { 1 + ; }");
    assert!(matches!(err, ParserError::ExpectedExpression(token) if token.is("+")));
}

#[test]
fn test_declaration_at_end_of_input() {
    assert!(matches!(parse_err("int x"), ParserError::UnexpectedEof { .. }));
}

#[test]
fn test_declaration_followed_by_garbage() {
    assert!(matches!(parse_err("int x = 1;"), ParserError::TrailingToken(t) if t.is("=")));
    assert!(matches!(parse_err("int f(int a) 5"), ParserError::TrailingToken(t) if t.is("5")));
    assert!(matches!(parse_err("int x; }"), ParserError::TrailingToken(t) if t.is("}")));
}

#[test]
fn test_body_after_non_function() {
    assert!(matches!(parse_err("int x { }"), ParserError::NotAFunction(t) if t.is("x")));
}

#[test]
fn test_declaration_without_name() {
    assert!(matches!(parse_err("int;"), ParserError::MissingName(t) if t.is("int")));
}

#[test]
fn test_function_pointer_is_a_type_error() {
    assert!(matches!(
        parse_err("int (*fp)(int);"),
        ParserError::Type {
            source: TypeError::PointerToFunction,
            ..
        }
    ));
}

#[test]
fn test_if_needs_a_statement() {
    let err = parse_err("int main() { if (a) }");
    assert!(matches!(
        err,
        ParserError::UnexpectedToken { token, expected: "statement" } if token.is("}")
    ));
}

#[test]
fn test_invalid_octal() {
    let err = parse_err("int main() { return 08; }");
    assert!(matches!(err, ParserError::InvalidNumber(t) if t.is("08")));
}
