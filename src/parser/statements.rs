//! Statement parsing.
//!
//! Alternatives are tried in a fixed order: expression statement, `return`,
//! `if`, compound block. Each one decides from the current token whether it
//! applies, so there is no backtracking.

use super::Parser;
use super::declarations::parse_declaration;
use super::expressions::parse_expr;
use crate::parser::ast::{CompoundStmt, Stmt};
use crate::parser::error::ParserError;
use crate::preprocessor::token::KeywordKind;
use log::trace;
use thin_vec::ThinVec;

type StmtResult = Result<Option<Stmt>, ParserError>;

/// Parse a statement
pub fn parse_statement(parser: &mut Parser) -> StmtResult {
    if let Some(stmt) = parse_expression_statement(parser)? {
        return Ok(Some(stmt));
    }
    if let Some(stmt) = parse_return_statement(parser)? {
        return Ok(Some(stmt));
    }
    if let Some(stmt) = parse_if_statement(parser)? {
        return Ok(Some(stmt));
    }
    Ok(parse_compound_statement(parser)?.map(Stmt::Compound))
}

/// `expr ;` or a lone `;`. An expression that is not followed by `;` is an error.
fn parse_expression_statement(parser: &mut Parser) -> StmtResult {
    match parse_expr(parser)? {
        Some(expr) => {
            let semi = parser.expect_punct(";")?;
            Ok(Some(Stmt::Expr {
                expr: Some(expr),
                semi,
            }))
        }
        None => Ok(parser
            .consume_punct(";")
            .map(|semi| Stmt::Expr { expr: None, semi })),
    }
}

fn parse_return_statement(parser: &mut Parser) -> StmtResult {
    let Some(token) = parser.consume_keyword(KeywordKind::Return) else {
        return Ok(None);
    };
    let expr = parse_expr(parser)?;
    parser.expect_punct(";")?;
    Ok(Some(Stmt::Return { expr, token }))
}

/// `if ( expr ) stmt`. There is no `else` branch.
fn parse_if_statement(parser: &mut Parser) -> StmtResult {
    let Some(token) = parser.consume_keyword(KeywordKind::If) else {
        return Ok(None);
    };
    let open = parser.expect_punct("(")?;
    let cond = parse_expr(parser)?.ok_or(ParserError::ExpectedExpression(open))?;
    parser.expect_punct(")")?;
    let then_stmt = match parse_statement(parser)? {
        Some(stmt) => stmt,
        None => return Err(parser.expected("statement")),
    };
    Ok(Some(Stmt::If {
        cond,
        then_stmt: Box::new(then_stmt),
        token,
    }))
}

/// Parse compound statement (block)
pub fn parse_compound_statement(parser: &mut Parser) -> Result<Option<CompoundStmt>, ParserError> {
    let Some(open) = parser.consume_punct("{") else {
        return Ok(None);
    };

    let mut items = ThinVec::new();
    loop {
        if let Some(decl) = parse_declaration(parser)? {
            items.push(Stmt::Decl(decl));
        } else if let Some(stmt) = parse_statement(parser)? {
            items.push(stmt);
        } else {
            break;
        }
    }
    parser.expect_punct("}")?;
    trace!("line {}: block with {} items", open.line, items.len());
    Ok(Some(CompoundStmt { items, open }))
}
