use crate::preprocessor::Preprocessor;
use crate::preprocessor::error::PreprocessorError;
use crate::preprocessor::lexer::Lexer;
use crate::preprocessor::token::{Token, TokenKind};
use crate::test_utils::{create_preprocessor, visible_text};

fn run(pp: &mut Preprocessor, src: &str) -> Result<Vec<Token>, PreprocessorError> {
    let _ = env_logger::builder().is_test(true).try_init();
    let tokens = Lexer::new(src).tokenize()?;
    pp.preprocess(tokens)
}

/// Preprocesses `src` and joins the non-delimiter tokens with single spaces.
fn expand(src: &str) -> String {
    let tokens = run(&mut Preprocessor::new(), src).unwrap();
    visible_text(&tokens)
}

fn expand_err(src: &str) -> PreprocessorError {
    run(&mut Preprocessor::new(), src).unwrap_err()
}

#[test]
fn test_object_like_macro() {
    assert_eq!(expand("#define FOO 1 + 2\nint x = FOO;"), "int x = 1 + 2 ;");
}

#[test]
fn test_function_like_macro_with_nested_call() {
    assert_eq!(
        expand("#define ADD(a, b) a + b\nADD(1, ADD(2, 3));"),
        "1 + 2 + 3 ;"
    );
}

#[test]
fn test_macro_without_parameters() {
    assert_eq!(expand("#define FOO() 42\nreturn FOO();"), "return 42 ;");
}

#[test]
fn test_space_before_paren_makes_object_like_macro() {
    assert_eq!(expand("#define X (1)\nX"), "( 1 )");
}

#[test]
fn test_parenthesized_argument_keeps_commas() {
    assert_eq!(expand("#define ID(x) x\nID((1, 2))"), "( 1 , 2 )");
}

#[test]
fn test_missing_argument_leaves_formal_in_place() {
    assert_eq!(expand("#define ADD(a, b) a + b\nADD(1)"), "1 + b");
}

#[test]
fn test_macro_used_in_replacement_is_rescanned() {
    assert_eq!(
        expand("#define ONE 1\n#define TWO ONE + ONE\nTWO"),
        "1 + 1"
    );
}

#[test]
fn test_redefinition_replaces_macro() {
    assert_eq!(expand("#define A 1\n#define A 2\nA"), "2");
}

#[test]
fn test_line_macro() {
    let tokens = run(&mut Preprocessor::new(), "a\n\n__LINE__").unwrap();
    let line = tokens.last().unwrap();
    assert_eq!(line.kind, TokenKind::DecimalNumber);
    assert!(line.is("3"));
}

#[test]
fn test_line_macro_after_continued_string() {
    let tokens = run(&mut Preprocessor::new(), "char *s = \"a\\\nb\";\n__LINE__").unwrap();
    assert!(tokens.last().unwrap().is("3"));
}

#[test]
fn test_line_macro_inside_expansion_keeps_definition_line() {
    assert_eq!(expand("#define HERE __LINE__\n\nHERE"), "1");
}

#[test]
fn test_comments_are_removed() {
    assert_eq!(expand("a // one\nb /* two\nlines */ c"), "a b c");
}

#[test]
fn test_comment_ends_replacement_list() {
    assert_eq!(expand("#define A 1 // one\nA /* x */ A"), "1 1");
}

#[test]
fn test_directive_line_is_removed() {
    let tokens = run(&mut Preprocessor::new(), "#define A 1\nx").unwrap();
    let texts: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
    assert_eq!(texts, vec!["x"]);
}

#[test]
fn test_define_from_command_line() {
    let mut pp = create_preprocessor(&["DEBUG", "LEVEL=10"]).unwrap();
    assert!(pp.is_defined("DEBUG"));
    let tokens = run(&mut pp, "DEBUG LEVEL").unwrap();
    assert_eq!(visible_text(&tokens), "1 10");
}

#[test]
fn test_invalid_command_line_define() {
    let mut pp = Preprocessor::new();
    assert!(matches!(
        pp.define("1X=2"),
        Err(PreprocessorError::InvalidDefine(_))
    ));
    assert!(!pp.is_defined("1X"));
}

#[test]
fn test_unterminated_block_comment() {
    let err = expand_err("a /* b");
    assert!(matches!(err, PreprocessorError::UnterminatedComment(t) if t.is("/*")));
}

#[test]
fn test_invalid_directive() {
    let err = expand_err("#include x");
    assert!(matches!(err, PreprocessorError::InvalidDirective(t) if t.is("include")));
}

#[test]
fn test_missing_macro_name() {
    let err = expand_err("#define 1 2");
    assert!(matches!(err, PreprocessorError::ExpectedMacroName(t) if t.is("1")));
}

#[test]
fn test_bad_parameter_name() {
    let err = expand_err("#define F(1) x");
    assert!(matches!(err, PreprocessorError::ExpectedParameterName(t) if t.is("1")));
}

#[test]
fn test_call_without_arguments() {
    let err = expand_err("#define F(a) a\nF;");
    assert!(matches!(err, PreprocessorError::ExpectedLeftParen(t) if t.is(";")));
}

#[test]
fn test_unclosed_call() {
    let err = expand_err("#define F(a) a\nF(1");
    assert!(matches!(err, PreprocessorError::ExpectedRightParen(t) if t.is("1")));
}

#[test]
fn test_too_many_arguments() {
    let err = expand_err("#define F(a) a\nF(1, 2)");
    assert!(matches!(err, PreprocessorError::ExpectedRightParen(t) if t.is("2")));
}

#[test]
fn test_lex_error_is_reported() {
    let mut pp = Preprocessor::new();
    assert!(matches!(
        run(&mut pp, "a @"),
        Err(PreprocessorError::Lex(_))
    ));
}
