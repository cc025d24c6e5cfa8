//! Declaration specifiers and declarators.

use super::Parser;
use crate::parser::ast::{Decl, DeclSpec, Declarator, DirectDeclarator};
use crate::parser::error::ParserError;
use crate::preprocessor::token::{KeywordKind, TokenKind};
use crate::types::{DeclaredType, Type, create_type_from_declarator};
use thin_vec::ThinVec;

/// `int`, `char`, `void` or `struct tag`.
pub fn parse_decl_spec(parser: &mut Parser) -> Result<Option<DeclSpec>, ParserError> {
    if let Some(token) = parser.consume_keyword(KeywordKind::Int) {
        return Ok(Some(DeclSpec::Int(token)));
    }
    if let Some(token) = parser.consume_keyword(KeywordKind::Char) {
        return Ok(Some(DeclSpec::Char(token)));
    }
    if let Some(token) = parser.consume_keyword(KeywordKind::Void) {
        return Ok(Some(DeclSpec::Void(token)));
    }
    if let Some(keyword) = parser.consume_keyword(KeywordKind::Struct) {
        let tag = parser
            .consume_kind(TokenKind::Identifier)
            .ok_or_else(|| parser.expected("struct tag"))?;
        return Ok(Some(DeclSpec::Struct { keyword, tag }));
    }
    Ok(None)
}

/// Zero or more `*` followed by a direct declarator, which may be abstract.
pub fn parse_declarator(parser: &mut Parser) -> Result<Declarator, ParserError> {
    let mut pointers = ThinVec::new();
    while let Some(star) = parser.consume_punct("*") {
        pointers.push(star);
    }
    let direct = parse_direct_declarator(parser)?;
    Ok(Declarator { pointers, direct })
}

fn parse_direct_declarator(parser: &mut Parser) -> Result<DirectDeclarator, ParserError> {
    let mut direct = if parser.consume_punct("(").is_some() {
        let inner = parse_declarator(parser)?;
        parser.expect_punct(")")?;
        DirectDeclarator::Paren(Box::new(inner))
    } else if let Some(name) = parser.consume_kind(TokenKind::Identifier) {
        DirectDeclarator::Ident(name)
    } else {
        DirectDeclarator::Abstract
    };

    if let Some(paren) = parser.consume_punct("(") {
        let mut params = ThinVec::new();
        if parser.consume_punct(")").is_none() {
            loop {
                match parse_declaration_body(parser)? {
                    Some(param) => params.push(param),
                    None => return Err(parser.expected("parameter declaration")),
                }
                if parser.consume_punct(",").is_none() {
                    break;
                }
            }
            parser.expect_punct(")")?;
        }
        direct = DirectDeclarator::Function {
            inner: Box::new(direct),
            params,
            paren,
        };
    }
    Ok(direct)
}

/// A specifier and its declarator, without the terminating `;`.
pub fn parse_declaration_body(parser: &mut Parser) -> Result<Option<Decl>, ParserError> {
    let Some(spec) = parse_decl_spec(parser)? else {
        return Ok(None);
    };
    let declarator = parse_declarator(parser)?;
    Ok(Some(Decl { spec, declarator }))
}

/// A block-scope declaration: `spec declarator ;`.
pub fn parse_declaration(parser: &mut Parser) -> Result<Option<Decl>, ParserError> {
    let Some(decl) = parse_declaration_body(parser)? else {
        return Ok(None);
    };
    parser.expect_punct(";")?;
    Ok(Some(decl))
}

/// Builds the type of a parsed declaration.
pub fn declared_type(decl: &Decl) -> Result<DeclaredType, ParserError> {
    create_type_from_declarator(&decl.declarator, Type::from_spec(&decl.spec)).map_err(|source| {
        ParserError::Type {
            source,
            token: decl.spec.token(),
        }
    })
}
