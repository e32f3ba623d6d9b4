use super::{Lexer, LexerError, LexerErrorKind};
use crate::token::*;

fn lex(source: &str) -> Result<Vec<Token>, LexerError> {
    Lexer::new(source, "test.sy").collect()
}

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).unwrap().into_iter().map(|t| t.kind).collect()
}

fn render(source: &str) -> String {
    lex(source)
        .unwrap()
        .iter()
        .map(|t| format!("{:?} {:?} {}:{}", t.kind, t.text, t.line, t.column))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn function_header() {
    insta::assert_snapshot!(render("fn add(a: Int) -> Int"), @r#"
    Keyword(Fn) "fn" 1:1
    Identifier "add" 1:4
    Symbol(LParen) "(" 1:7
    Identifier "a" 1:8
    Symbol(Colon) ":" 1:9
    TypeName "Int" 1:11
    Symbol(RParen) ")" 1:14
    Symbol(Arrow) "->" 1:16
    TypeName "Int" 1:19
    "#);
}

#[test]
fn newlines_reset_column() {
    insta::assert_snapshot!(render("a\n  b\n\nc"), @r#"
    Identifier "a" 1:1
    Newline "\n" 1:2
    Identifier "b" 2:3
    Newline "\n" 2:4
    Newline "\n" 3:1
    Identifier "c" 4:1
    "#);
}

#[test]
fn float_is_not_split() {
    assert_eq!(kinds("3.14"), vec![TokenKind::Float]);
    assert_eq!(kinds("3"), vec![TokenKind::Integer]);
    assert_eq!(
        kinds("3."),
        vec![TokenKind::Integer, TokenKind::Symbol(Symbol::Dot)]
    );
}

#[test]
fn range_after_integer() {
    assert_eq!(
        kinds("1..<5"),
        vec![
            TokenKind::Integer,
            TokenKind::Operator(Operator::RangeExclusive),
            TokenKind::Integer,
        ]
    );
    assert_eq!(
        kinds("1...5"),
        vec![
            TokenKind::Integer,
            TokenKind::Operator(Operator::RangeInclusive),
            TokenKind::Integer,
        ]
    );
}

#[test]
fn keywords_need_word_boundaries() {
    assert_eq!(kinds("return"), vec![TokenKind::Keyword(Keyword::Return)]);
    assert_eq!(kinds("return0"), vec![TokenKind::Identifier]);
    assert_eq!(kinds("fnx"), vec![TokenKind::Identifier]);
    assert_eq!(kinds("RETURN"), vec![TokenKind::TypeName]);
}

#[test]
fn booleans_before_identifiers() {
    assert_eq!(kinds("true false"), vec![TokenKind::Bool, TokenKind::Bool]);
    assert_eq!(kinds("trueish"), vec![TokenKind::Identifier]);
}

#[test]
fn underscores_in_identifiers() {
    let tokens = lex("print_arg _x").unwrap();
    assert_eq!(tokens[0].text, "print_arg");
    assert_eq!(tokens[1].text, "_x");
    assert!(tokens.iter().all(|t| t.kind == TokenKind::Identifier));
}

#[test]
fn clusters_are_greedy() {
    assert_eq!(
        kinds("== != <= >= && || < >"),
        vec![
            TokenKind::Operator(Operator::EqEq),
            TokenKind::Operator(Operator::NotEq),
            TokenKind::Operator(Operator::LtEq),
            TokenKind::Operator(Operator::GtEq),
            TokenKind::Operator(Operator::AndAnd),
            TokenKind::Operator(Operator::OrOr),
            TokenKind::Operator(Operator::Lt),
            TokenKind::Operator(Operator::Gt),
        ]
    );
    assert_eq!(
        kinds("a-b->c"),
        vec![
            TokenKind::Identifier,
            TokenKind::Operator(Operator::Sub),
            TokenKind::Identifier,
            TokenKind::Symbol(Symbol::Arrow),
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn string_literal_with_escapes() {
    let tokens = lex(r#"x "a \"b\" c" y"#).unwrap();
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].text, r#""a \"b\" c""#);
    assert_eq!(tokens[2].column, 15);
}

#[test]
fn comments_are_filtered() {
    assert_eq!(
        kinds("a // note\nb /* block */ c"),
        vec![
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Identifier,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn position_after_multiline_comment() {
    let tokens = lex("/* one\ntwo */ x").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!((tokens[0].line, tokens[0].column), (2, 8));
}

#[test]
fn trivia_reconstructs_source() {
    let sources = [
        "",
        "fn add(a: Int, b: Int) -> Int { return a + b }",
        "fn f() {\n\tprint_arg(arg: 1) // say it\n  /* multi\n line */ \r\n}\n",
        "x \"str\\n\" 3.25 ..< ... -> </ /> != 12",
    ];

    for source in sources {
        let tokens: Vec<_> = Lexer::new(source, "test.sy")
            .with_trivia()
            .collect::<Result<_, _>>()
            .unwrap();

        let rebuilt: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, source);

        for token in &tokens {
            assert_eq!(&source[token.span.start..token.span.end], token.text);
        }
    }
}

#[test]
fn unexpected_char_is_an_error() {
    let err = lex("a @ b").unwrap_err();
    assert_eq!(err.kind, LexerErrorKind::UnexpectedChar('@'));
    assert_eq!((err.line, err.column), (1, 3));
}

#[test]
fn error_ends_the_stream() {
    let mut lexer = Lexer::new("a $ b", "test.sy");
    assert!(lexer.next().unwrap().is_ok());
    assert!(lexer.next().unwrap().is_err());
    assert!(lexer.next().is_none());
}

#[test]
fn unterminated_string() {
    let err = lex("\"abc").unwrap_err();
    assert_eq!(err.kind, LexerErrorKind::UnterminatedString);
}

#[test]
fn unterminated_comment() {
    let err = lex("a /* abc").unwrap_err();
    assert_eq!(err.kind, LexerErrorKind::UnterminatedComment);
    assert_eq!(err.column, 3);
}
