//! Expression parsing.
//!
//! One function per precedence level, from the comma operator down to
//! primary expressions. Binary levels parse the next-higher level and fold
//! operators into a left-leaning tree; assignment and `?:` recurse on their
//! right operand instead, which makes them right-associative.

use super::Parser;
use crate::parser::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::parser::error::ParserError;
use crate::preprocessor::token::{KeywordKind, Token, TokenKind};
use log::trace;
use thin_vec::ThinVec;

type ExprResult = Result<Option<Expr>, ParserError>;

const COMMA: &[(&str, BinaryOp)] = &[(",", BinaryOp::Comma)];
const LOGICAL_OR: &[(&str, BinaryOp)] = &[("||", BinaryOp::LogicalOr)];
const LOGICAL_AND: &[(&str, BinaryOp)] = &[("&&", BinaryOp::LogicalAnd)];
const BIT_OR: &[(&str, BinaryOp)] = &[("|", BinaryOp::BitOr)];
const BIT_XOR: &[(&str, BinaryOp)] = &[("^", BinaryOp::BitXor)];
const BIT_AND: &[(&str, BinaryOp)] = &[("&", BinaryOp::BitAnd)];
const EQUALITY: &[(&str, BinaryOp)] = &[("==", BinaryOp::Eq), ("!=", BinaryOp::Ne)];
const RELATIONAL: &[(&str, BinaryOp)] = &[
    ("<", BinaryOp::Lt),
    (">", BinaryOp::Gt),
    ("<=", BinaryOp::Le),
    (">=", BinaryOp::Ge),
];
const SHIFT: &[(&str, BinaryOp)] = &[("<<", BinaryOp::Shl), (">>", BinaryOp::Shr)];
const ADDITIVE: &[(&str, BinaryOp)] = &[("+", BinaryOp::Add), ("-", BinaryOp::Sub)];
const MULTIPLICATIVE: &[(&str, BinaryOp)] = &[
    ("*", BinaryOp::Mul),
    ("/", BinaryOp::Div),
    ("%", BinaryOp::Mod),
];

/// Parses a full expression, comma operator included.
pub fn parse_expr(parser: &mut Parser) -> ExprResult {
    parse_binary_level(parser, COMMA, parse_assign)
}

/// Parses an assignment expression (right-associative).
pub fn parse_assign(parser: &mut Parser) -> ExprResult {
    let Some(lhs) = parse_conditional(parser)? else {
        return Ok(None);
    };
    if let Some(op) = parser.consume_punct("=") {
        let rhs = required(parse_assign(parser)?, op)?;
        return Ok(Some(binary(BinaryOp::Assign, lhs, rhs, op)));
    }
    Ok(Some(lhs))
}

fn parse_conditional(parser: &mut Parser) -> ExprResult {
    let Some(cond) = parse_logical_or(parser)? else {
        return Ok(None);
    };
    let Some(question) = parser.consume_punct("?") else {
        return Ok(Some(cond));
    };
    let then_expr = required(parse_conditional(parser)?, question)?;
    parser.expect_punct(":")?;
    let else_expr = required(parse_conditional(parser)?, question)?;
    let kind = ExprKind::Ternary {
        cond: Box::new(cond),
        then_expr: Box::new(then_expr),
        else_expr: Box::new(else_expr),
    };
    Ok(Some(Expr::new(kind, question)))
}

fn parse_logical_or(parser: &mut Parser) -> ExprResult {
    parse_binary_level(parser, LOGICAL_OR, parse_logical_and)
}

fn parse_logical_and(parser: &mut Parser) -> ExprResult {
    parse_binary_level(parser, LOGICAL_AND, parse_bit_or)
}

fn parse_bit_or(parser: &mut Parser) -> ExprResult {
    parse_binary_level(parser, BIT_OR, parse_bit_xor)
}

fn parse_bit_xor(parser: &mut Parser) -> ExprResult {
    parse_binary_level(parser, BIT_XOR, parse_bit_and)
}

fn parse_bit_and(parser: &mut Parser) -> ExprResult {
    parse_binary_level(parser, BIT_AND, parse_equality)
}

fn parse_equality(parser: &mut Parser) -> ExprResult {
    parse_binary_level(parser, EQUALITY, parse_relational)
}

fn parse_relational(parser: &mut Parser) -> ExprResult {
    parse_binary_level(parser, RELATIONAL, parse_shift)
}

fn parse_shift(parser: &mut Parser) -> ExprResult {
    parse_binary_level(parser, SHIFT, parse_additive)
}

fn parse_additive(parser: &mut Parser) -> ExprResult {
    parse_binary_level(parser, ADDITIVE, parse_multiplicative)
}

fn parse_multiplicative(parser: &mut Parser) -> ExprResult {
    parse_binary_level(parser, MULTIPLICATIVE, parse_cast)
}

/// Casts are not supported yet, so a cast expression is a unary expression.
fn parse_cast(parser: &mut Parser) -> ExprResult {
    parse_unary(parser)
}

fn parse_unary(parser: &mut Parser) -> ExprResult {
    let Some(token) = parser.peek().copied() else {
        return Ok(None);
    };

    if token.kind == TokenKind::Punct {
        if let Some(op) = UnaryOp::from_punct(token.as_str()) {
            parser.next_token();
            let operand = required(parse_cast(parser)?, token)?;
            return Ok(Some(unary(op, operand, token)));
        }
    }
    if let Some(sizeof) = parser.consume_keyword(KeywordKind::Sizeof) {
        let operand = required(parse_unary(parser)?, sizeof)?;
        return Ok(Some(unary(UnaryOp::Sizeof, operand, sizeof)));
    }
    parse_postfix(parser)
}

fn parse_postfix(parser: &mut Parser) -> ExprResult {
    let Some(mut expr) = parse_primary(parser)? else {
        return Ok(None);
    };

    while let Some(open) = parser.consume_punct("(") {
        let mut args = ThinVec::new();
        if parser.consume_punct(")").is_none() {
            loop {
                match parse_assign(parser)? {
                    Some(arg) => args.push(arg),
                    None => return Err(parser.expected("expression")),
                }
                if parser.consume_punct(",").is_none() {
                    break;
                }
            }
            parser.expect_punct(")")?;
        }
        trace!("call of {} with {} arguments", expr.token, args.len());
        expr = Expr::new(ExprKind::Call(Box::new(expr), args), open);
    }
    Ok(Some(expr))
}

fn parse_primary(parser: &mut Parser) -> ExprResult {
    let Some(token) = parser.peek().copied() else {
        return Ok(None);
    };

    let kind = match token.kind {
        TokenKind::DecimalNumber => ExprKind::Number(
            token
                .as_str()
                .parse::<i64>()
                .map_err(|_| ParserError::InvalidNumber(token))?,
        ),
        TokenKind::OctalNumber => ExprKind::Number(
            i64::from_str_radix(token.as_str(), 8).map_err(|_| ParserError::InvalidNumber(token))?,
        ),
        TokenKind::Identifier => ExprKind::Ident(token.text),
        TokenKind::Char => ExprKind::Char(token.text),
        TokenKind::String => ExprKind::String(token.text),
        TokenKind::Punct if token.is("(") => {
            parser.next_token();
            // Grouping only; no node is kept for the parentheses.
            let inner = required(parse_expr(parser)?, token)?;
            parser.expect_punct(")")?;
            return Ok(Some(inner));
        }
        _ => return Ok(None),
    };
    parser.next_token();
    Ok(Some(Expr::new(kind, token)))
}

/// Parses `next (op next)*` for the operators in `ops`, folding to the left.
fn parse_binary_level(
    parser: &mut Parser,
    ops: &[(&str, BinaryOp)],
    next: fn(&mut Parser) -> ExprResult,
) -> ExprResult {
    let Some(mut lhs) = next(parser)? else {
        return Ok(None);
    };
    loop {
        let Some((token, op)) = ops
            .iter()
            .find_map(|&(text, op)| parser.consume_punct(text).map(|token| (token, op)))
        else {
            return Ok(Some(lhs));
        };
        let rhs = required(next(parser)?, token)?;
        lhs = binary(op, lhs, rhs, token);
    }
}

/// An operand that must follow `after`.
fn required(expr: Option<Expr>, after: Token) -> Result<Expr, ParserError> {
    expr.ok_or(ParserError::ExpectedExpression(after))
}

fn unary(op: UnaryOp, operand: Expr, token: Token) -> Expr {
    Expr::new(ExprKind::Unary(op, Box::new(operand)), token)
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, token: Token) -> Expr {
    Expr::new(ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)), token)
}
