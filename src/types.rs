//! Structural type descriptors.
//!
//! Types are built from parsed declarators and compared by shape, never by
//! identity: two independently built `int`s are the same type.

use crate::parser::ast::{DeclSpec, Declarator, DirectDeclarator};
use crate::preprocessor::token::{NameId, Token};
use itertools::Itertools;
use std::fmt;
use thin_vec::ThinVec;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Base(BaseKind),
    Pointer(Box<Type>),
    /// Marks an expression that designates a storage location of the inner type.
    LValue(Box<Type>),
    Function {
        ret: Box<Type>,
        params: ThinVec<Type>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseKind {
    Int,
    Char,
    Void,
    Struct(NameId),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("cannot compare `{0}` with `{1}`")]
    Incomparable(String, String),
    #[error("size of `{0}` is unknown")]
    UnknownSize(String),
    #[error("pointers to functions are not supported")]
    PointerToFunction,
    #[error("a function cannot return a function")]
    FunctionReturningFunction,
}

/// A type built from a declarator, with the name it declares (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredType {
    pub name: Option<Token>,
    pub ty: Type,
}

impl Type {
    pub fn int() -> Self {
        Type::Base(BaseKind::Int)
    }

    pub fn char() -> Self {
        Type::Base(BaseKind::Char)
    }

    pub fn pointer_to(inner: Type) -> Self {
        Type::Pointer(Box::new(inner))
    }

    /// Wraps `inner` as an lvalue. An lvalue is never wrapped twice.
    pub fn lvalue(inner: Type) -> Self {
        match inner {
            Type::LValue(_) => inner,
            _ => Type::LValue(Box::new(inner)),
        }
    }

    pub fn from_spec(spec: &DeclSpec) -> Self {
        Type::Base(match spec {
            DeclSpec::Int(_) => BaseKind::Int,
            DeclSpec::Char(_) => BaseKind::Char,
            DeclSpec::Void(_) => BaseKind::Void,
            DeclSpec::Struct { tag, .. } => BaseKind::Struct(tag.text),
        })
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. })
    }
}

/// Structural equality over base, pointer and lvalue types.
///
/// Differing shapes are never the same. Two function types cannot be compared
/// and yield `TypeError::Incomparable`.
pub fn is_same_type(a: &Type, b: &Type) -> Result<bool, TypeError> {
    match (a, b) {
        (Type::Base(x), Type::Base(y)) => Ok(x == y),
        (Type::Pointer(x), Type::Pointer(y)) | (Type::LValue(x), Type::LValue(y)) => {
            is_same_type(x, y)
        }
        (Type::Function { .. }, Type::Function { .. }) => {
            Err(TypeError::Incomparable(a.to_string(), b.to_string()))
        }
        _ => Ok(false),
    }
}

/// Strips one lvalue layer, if there is one.
pub fn get_rvalue_type(ty: &Type) -> &Type {
    match ty {
        Type::LValue(inner) => inner,
        _ => ty,
    }
}

/// Whether a value of type `src` may be stored into `dst`.
pub fn is_assignable(dst: &Type, src: &Type) -> Result<bool, TypeError> {
    match dst {
        Type::LValue(inner) => is_same_type(inner, src),
        _ => Ok(false),
    }
}

/// Size in bytes of `int`, `char` and pointer types (lvalues are unwrapped first).
pub fn size_of(ty: &Type) -> Result<usize, TypeError> {
    match get_rvalue_type(ty) {
        Type::Base(BaseKind::Int) => Ok(4),
        Type::Base(BaseKind::Char) => Ok(1),
        Type::Pointer(_) => Ok(8),
        other => Err(TypeError::UnknownSize(other.to_string())),
    }
}

/// Builds the type a declarator gives to `base`.
///
/// The pointer chain wraps `base` first; the direct declarator is then applied
/// inside-out, so `*f(int)` is a function returning a pointer and `(*p)` inside
/// a grouping applies its stars to whatever the outer suffixes built.
pub fn create_type_from_declarator(decl: &Declarator, base: Type) -> Result<DeclaredType, TypeError> {
    let mut ty = base;
    for _ in &decl.pointers {
        if ty.is_function() {
            return Err(TypeError::PointerToFunction);
        }
        ty = Type::pointer_to(ty);
    }
    apply_direct(&decl.direct, ty)
}

fn apply_direct(direct: &DirectDeclarator, ty: Type) -> Result<DeclaredType, TypeError> {
    match direct {
        DirectDeclarator::Abstract => Ok(DeclaredType { name: None, ty }),
        DirectDeclarator::Ident(name) => Ok(DeclaredType {
            name: Some(*name),
            ty,
        }),
        DirectDeclarator::Paren(inner) => create_type_from_declarator(inner, ty),
        DirectDeclarator::Function { inner, params, .. } => {
            if ty.is_function() {
                return Err(TypeError::FunctionReturningFunction);
            }
            let params = params
                .iter()
                .map(|param| {
                    create_type_from_declarator(&param.declarator, Type::from_spec(&param.spec))
                        .map(|declared| declared.ty)
                })
                .collect::<Result<ThinVec<_>, _>>()?;
            let function = Type::Function {
                ret: Box::new(ty),
                params,
            };
            apply_direct(inner, function)
        }
    }
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BaseKind::Int => write!(f, "int"),
            BaseKind::Char => write!(f, "char"),
            BaseKind::Void => write!(f, "void"),
            BaseKind::Struct(tag) => write!(f, "struct {}", tag),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Base(kind) => write!(f, "{}", kind),
            Type::Pointer(inner) => write!(f, "pointer to {}", inner),
            Type::LValue(inner) => write!(f, "lvalue of {}", inner),
            Type::Function { ret, params } => {
                write!(f, "function({}) returning {}", params.iter().join(", "), ret)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::parser::declarations::parse_declaration_body;
    use crate::preprocessor::lexer::Lexer;

    fn declared(src: &str) -> Result<DeclaredType, TypeError> {
        let tokens = Lexer::new(src).tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        let decl = parse_declaration_body(&mut parser).unwrap().unwrap();
        create_type_from_declarator(&decl.declarator, Type::from_spec(&decl.spec))
    }

    #[test]
    fn test_same_type_is_structural() {
        let int = Type::int();
        let another_int = Type::int();
        let lvalue_int = Type::lvalue(int.clone());
        let pointer = Type::pointer_to(int.clone());
        let another_pointer = Type::pointer_to(another_int.clone());

        assert!(is_same_type(&int, &int).unwrap());
        assert!(is_same_type(&int, &another_int).unwrap());
        assert!(!is_same_type(&int, &lvalue_int).unwrap());
        assert!(is_same_type(&lvalue_int, &lvalue_int).unwrap());
        assert!(!is_same_type(&int, &pointer).unwrap());
        assert!(is_same_type(&pointer, &another_pointer).unwrap());
        assert!(!is_same_type(&Type::int(), &Type::char()).unwrap());
    }

    #[test]
    fn test_function_types_are_incomparable() {
        let f = declared("int f(int a)").unwrap().ty;
        let g = declared("int g(int b)").unwrap().ty;
        assert!(matches!(
            is_same_type(&f, &g),
            Err(TypeError::Incomparable(..))
        ));
        assert!(!is_same_type(&f, &Type::int()).unwrap());
        assert!(!is_same_type(&Type::pointer_to(Type::int()), &f).unwrap());
    }

    #[test]
    fn test_function_is_not_assignable_to_int() {
        let f = declared("int f(int a)").unwrap().ty;
        assert!(!is_assignable(&Type::lvalue(Type::int()), &f).unwrap());
    }

    #[test]
    fn test_rvalue_unwrap_is_idempotent() {
        for ty in [
            Type::int(),
            Type::lvalue(Type::char()),
            Type::pointer_to(Type::lvalue(Type::int())),
        ] {
            let once = get_rvalue_type(&ty);
            assert_eq!(get_rvalue_type(once), once);
        }
    }

    #[test]
    fn test_lvalue_never_double_wraps() {
        let once = Type::lvalue(Type::int());
        assert_eq!(Type::lvalue(once.clone()), once);
    }

    #[test]
    fn test_assignable_needs_lvalue() {
        let int = Type::int();
        assert!(is_assignable(&Type::lvalue(int.clone()), &int).unwrap());
        assert!(!is_assignable(&int, &int).unwrap());
        assert!(!is_assignable(&Type::lvalue(int.clone()), &Type::char()).unwrap());
    }

    #[test]
    fn test_sizes() {
        assert_eq!(size_of(&Type::int()).unwrap(), 4);
        assert_eq!(size_of(&Type::char()).unwrap(), 1);
        assert_eq!(size_of(&Type::pointer_to(Type::char())).unwrap(), 8);
        assert_eq!(size_of(&Type::lvalue(Type::int())).unwrap(), 4);
        assert!(matches!(
            size_of(&Type::Base(BaseKind::Void)),
            Err(TypeError::UnknownSize(_))
        ));
    }

    #[test]
    fn test_pointer_declarator() {
        let d = declared("char **p").unwrap();
        assert!(d.name.unwrap().is("p"));
        assert_eq!(d.ty.to_string(), "pointer to pointer to char");
    }

    #[test]
    fn test_function_declarator_records_every_parameter() {
        let d = declared("int *f(int a, char *s, struct point)").unwrap();
        assert!(d.name.unwrap().is("f"));
        assert_eq!(
            d.ty.to_string(),
            "function(int, pointer to char, struct point) returning pointer to int"
        );
    }

    #[test]
    fn test_grouped_declarator() {
        let d = declared("int (x)").unwrap();
        assert!(d.name.unwrap().is("x"));
        assert_eq!(d.ty, Type::int());
    }

    #[test]
    fn test_function_pointer_is_rejected() {
        assert_eq!(declared("int (*fp)(int)"), Err(TypeError::PointerToFunction));
    }

    #[test]
    fn test_abstract_declarator_has_no_name() {
        let d = declared("int *").unwrap();
        assert!(d.name.is_none());
        assert_eq!(d.ty, Type::pointer_to(Type::int()));
    }
}
