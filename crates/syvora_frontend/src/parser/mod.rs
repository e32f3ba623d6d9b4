
mod expr;

use std::convert::Infallible;

use syvora_diagnostic::{Excerpt, SourceFile, Span};

use crate::ast::*;
use crate::lexer::{Lexer, LexerError, LexerErrorKind};
use crate::token::{Keyword, Symbol, Token, TokenKind};

/// A fatal syntax error with a rendered source excerpt.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{kind}\nat {file}, line {line}, column {column}\n{excerpt}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub span: Span,
    pub excerpt: Excerpt,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("expected {expected}, but got {found}")]
    Expected { expected: String, found: String },

    #[error("{0}")]
    Lexical(LexerErrorKind),

    #[error("invalid {kind} `{text}`")]
    InvalidLiteral { kind: &'static str, text: String },

    #[error("{0} are not yet supported")]
    NotYetSupported(&'static str),
}

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Recursive-descent parser with a single token of lookahead.
pub struct Parser<'src> {
    source: &'src SourceFile,
    tokens: Lexer<'src>,

    current: Option<Token<'src>>,
    prev_span: Span,

    /// Whether a call may take trailing `{ ... }` children here. Off while
    /// parsing an `if` condition, where the brace opens the then-block.
    allow_children: bool,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src SourceFile) -> ParseResult<Self> {
        let mut parser = Self {
            source,
            tokens: Lexer::new(source.text(), source.name()),

            current: None,
            prev_span: Span::empty(0),

            allow_children: true,
        };

        parser.bump()?;
        Ok(parser)
    }

    pub fn parse(mut self) -> ParseResult<Module> {
        log::debug!("parsing {}", self.source.name());

        let mut functions = vec![];

        self.skip_newlines()?;
        loop {
            let function = self.parse_item()?;
            log::trace!("parsed function `{}`", function.low_level_name());
            functions.push(function);

            if self.at_end() {
                break;
            }

            if !self.at(TokenKind::Newline) {
                return Err(self.error_expected("a newline"));
            }

            self.skip_newlines()?;
            if self.at_end() {
                break;
            }
        }

        Ok(Module { functions })
    }

    fn parse_item(&mut self) -> ParseResult<FunctionDeclaration> {
        match self.peek_kind() {
            Some(TokenKind::Keyword(Keyword::Import)) => match self.parse_import_statement()? {},
            Some(TokenKind::Keyword(Keyword::Struct)) => {
                match self.parse_structure_declaration()? {}
            }
            Some(TokenKind::Keyword(Keyword::Export)) => match self.parse_export_statement()? {},
            _ => self.parse_function_declaration(),
        }
    }

    pub fn parse_import_statement(&mut self) -> ParseResult<Infallible> {
        Err(self.error_at_current(SyntaxErrorKind::NotYetSupported("import statements")))
    }

    pub fn parse_structure_declaration(&mut self) -> ParseResult<Infallible> {
        Err(self.error_at_current(SyntaxErrorKind::NotYetSupported(
            "struct declarations",
        )))
    }

    pub fn parse_export_statement(&mut self) -> ParseResult<Infallible> {
        Err(self.error_at_current(SyntaxErrorKind::NotYetSupported("export statements")))
    }

    pub fn parse_function_declaration(&mut self) -> ParseResult<FunctionDeclaration> {
        self.expect(TokenKind::Keyword(Keyword::Fn))?;
        let name = self.parse_ident()?;

        self.expect(TokenKind::Symbol(Symbol::LParen))?;
        self.skip_newlines()?;

        let arguments = if self.at(TokenKind::Identifier) {
            self.parse_argument_list()?
        } else {
            vec![]
        };

        self.expect(TokenKind::Symbol(Symbol::RParen))?;

        let return_type = if self.eat(TokenKind::Symbol(Symbol::Arrow))? {
            Some(self.parse_accessible_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;

        Ok(FunctionDeclaration {
            name,
            arguments,
            return_type,
            body,
        })
    }

    fn parse_argument_list(&mut self) -> ParseResult<Vec<Argument>> {
        let mut arguments = vec![self.parse_argument()?];

        while self.eat(TokenKind::Symbol(Symbol::Comma))? {
            self.skip_newlines()?;

            // trailing comma
            if !self.at(TokenKind::Identifier) {
                break;
            }

            arguments.push(self.parse_argument()?);
        }

        Ok(arguments)
    }

    fn parse_argument(&mut self) -> ParseResult<Argument> {
        let identifier = self.parse_ident()?;
        self.expect(TokenKind::Symbol(Symbol::Colon))?;
        let ty = self.parse_accessible_type()?;

        Ok(Argument { identifier, ty })
    }

    fn parse_accessible_type(&mut self) -> ParseResult<AccessibleTypeExpression> {
        let name = self.expect(TokenKind::TypeName)?;

        let child = if self.eat(TokenKind::Symbol(Symbol::Dot))? {
            Some(Box::new(self.parse_accessible_type()?))
        } else {
            None
        };

        Ok(AccessibleTypeExpression {
            name: name.text.to_owned(),
            child,
            span: name.span.union(self.prev_span),
        })
    }

    pub fn parse_block(&mut self) -> ParseResult<Block> {
        self.with_children_allowed(true, |parser| {
            parser.expect(TokenKind::Symbol(Symbol::LBrace))?;
            parser.skip_newlines()?;

            let statements = if parser.has_next_statement() {
                parser.parse_statement_list()?
            } else {
                vec![]
            };

            let return_expression = if parser.eat(TokenKind::Keyword(Keyword::Return))? {
                let expr = parser.parse_statement()?;
                parser.skip_newlines()?;
                Some(Box::new(expr))
            } else {
                None
            };

            parser.expect(TokenKind::Symbol(Symbol::RBrace))?;

            Ok(Block {
                statements,
                return_expression,
            })
        })
    }

    fn has_next_statement(&self) -> bool {
        !(self.at_end()
            || self.at(TokenKind::Keyword(Keyword::Return))
            || self.at(TokenKind::Symbol(Symbol::RBrace)))
    }

    fn go_next_statement(&mut self) -> ParseResult<bool> {
        if !self.at(TokenKind::Newline) {
            return Ok(false);
        }

        self.skip_newlines()?;
        Ok(self.has_next_statement())
    }

    fn parse_statement_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut statements = vec![self.parse_statement()?];

        while self.go_next_statement()? {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    fn parse_statement(&mut self) -> ParseResult<Expr> {
        self.parse_expr()
    }

    fn parse_ident(&mut self) -> ParseResult<Ident> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(Ident::new(token.text, token.span))
    }

    fn with_children_allowed<T>(
        &mut self,
        allowed: bool,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let prev = std::mem::replace(&mut self.allow_children, allowed);
        let result = parse(self);
        self.allow_children = prev;
        result
    }

    // token handling

    /// Advance by one token, returning the token that was current.
    fn bump(&mut self) -> ParseResult<Option<Token<'src>>> {
        let next = match self.tokens.next() {
            Some(Ok(token)) => Some(token),
            Some(Err(err)) => return Err(self.lexer_error(err)),
            None => None,
        };

        let prev = std::mem::replace(&mut self.current, next);
        if let Some(token) = prev {
            self.prev_span = token.span;
        }

        Ok(prev)
    }

    fn peek(&self) -> Option<Token<'src>> {
        self.current
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.current.map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn at_end(&self) -> bool {
        self.current.is_none()
    }

    fn eat(&mut self, kind: TokenKind) -> ParseResult<bool> {
        if self.at(kind) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token<'src>> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.bump()?;
                Ok(token)
            }
            _ => Err(self.error_expected(kind.token_name())),
        }
    }

    fn skip_newlines(&mut self) -> ParseResult<()> {
        while self.at(TokenKind::Newline) {
            self.bump()?;
        }
        Ok(())
    }

    // errors

    fn error_expected(&self, expected: impl Into<String>) -> SyntaxError {
        let found = match self.peek() {
            Some(token) => token.describe(),
            None => "end of input".to_owned(),
        };

        self.error_at_current(SyntaxErrorKind::Expected {
            expected: expected.into(),
            found,
        })
    }

    fn error_at_current(&self, kind: SyntaxErrorKind) -> SyntaxError {
        match self.peek() {
            Some(token) => self.error_at(kind, token.span, token.line, token.column),
            None => {
                let (span, line, column) = self.tokens.eof_position();
                self.error_at(kind, span, line, column)
            }
        }
    }

    fn lexer_error(&self, err: LexerError) -> SyntaxError {
        self.error_at(
            SyntaxErrorKind::Lexical(err.kind),
            err.span,
            err.line,
            err.column,
        )
    }

    fn error_at(&self, kind: SyntaxErrorKind, span: Span, line: usize, column: usize) -> SyntaxError {
        SyntaxError {
            kind,
            file: self.tokens.file().to_owned(),
            line,
            column,
            span,
            excerpt: self.source.excerpt(line, column),
        }
    }
}
