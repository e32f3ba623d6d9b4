//! Lexing and parsing of Syvora source text.

#[macro_use]
extern crate macro_rules_attribute;

mod lexer;
mod parser;

pub mod ast;
pub mod token;

pub use lexer::{Lexer, LexerError, LexerErrorKind, LexerResult};
pub use parser::{ParseResult, Parser, SyntaxError, SyntaxErrorKind};

use ast::Module;
use syvora_diagnostic::SourceFile;

derive_alias! {
    #[derive(Node!)] = #[derive(Debug, Clone, PartialEq)];
    #[derive(NodeCopy!)] = #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)];
}

pub fn parse(source: &SourceFile) -> ParseResult<Module> {
    Parser::new(source)?.parse()
}
