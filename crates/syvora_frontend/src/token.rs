use std::fmt;

use syvora_diagnostic::Span;

use crate::NodeCopy;

#[derive(NodeCopy!)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,

    /// 1-based.
    pub line: usize,
    /// 1-based, counted in characters.
    pub column: usize,

    pub file: &'src str,
}

impl Token<'_> {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Newline => "newline".to_owned(),
            kind => format!("{} `{}`", kind.category(), self.text),
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}, line {}, column {}",
            self.describe(),
            self.file,
            self.line,
            self.column
        )
    }
}

#[derive(NodeCopy!)]
pub enum TokenKind {
    Keyword(Keyword),
    TypeName,
    Identifier,

    Integer,
    Float,
    Bool,
    String,

    Whitespace,
    Newline,
    Comment,

    Operator(Operator),
    Symbol(Symbol),
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    pub fn category(self) -> &'static str {
        match self {
            Self::Keyword(_) => "keyword",
            Self::TypeName => "type name",
            Self::Identifier => "identifier",
            Self::Integer => "integer literal",
            Self::Float => "float literal",
            Self::Bool => "boolean literal",
            Self::String => "string literal",
            Self::Whitespace => "whitespace",
            Self::Newline => "newline",
            Self::Comment => "comment",
            Self::Operator(_) => "operator",
            Self::Symbol(_) => "symbol",
        }
    }

    /// Human readable name used in "expected ..." messages.
    pub fn token_name(self) -> String {
        match self {
            Self::Keyword(kw) => format!("keyword `{}`", kw.as_str()),
            Self::Operator(op) => format!("operator `{}`", op.as_str()),
            Self::Symbol(sym) => format!("symbol `{}`", sym.as_str()),
            other => other.category().to_owned(),
        }
    }
}

#[derive(NodeCopy!)]
pub enum Keyword {
    Import,
    As,
    Struct,
    Pub,
    Const,
    Var,
    Fn,
    Export,
    Return,
    If,
    Else,
    Throws,
    Async,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        let kw = match word {
            "import" => Self::Import,
            "as" => Self::As,
            "struct" => Self::Struct,
            "pub" => Self::Pub,
            "const" => Self::Const,
            "var" => Self::Var,
            "fn" => Self::Fn,
            "export" => Self::Export,
            "return" => Self::Return,
            "if" => Self::If,
            "else" => Self::Else,
            "throws" => Self::Throws,
            "async" => Self::Async,
            _ => return None,
        };
        Some(kw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::As => "as",
            Self::Struct => "struct",
            Self::Pub => "pub",
            Self::Const => "const",
            Self::Var => "var",
            Self::Fn => "fn",
            Self::Export => "export",
            Self::Return => "return",
            Self::If => "if",
            Self::Else => "else",
            Self::Throws => "throws",
            Self::Async => "async",
        }
    }
}

#[derive(NodeCopy!)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Caret,
    Bang,
    Assign,
    Lt,
    Gt,
    Amp,
    Pipe,

    EqEq,
    NotEq,
    LtEq,
    GtEq,
    AndAnd,
    OrOr,
    RangeInclusive,
    RangeExclusive,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Caret => "^",
            Self::Bang => "!",
            Self::Assign => "=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Amp => "&",
            Self::Pipe => "|",
            Self::EqEq => "==",
            Self::NotEq => "!=",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::RangeInclusive => "...",
            Self::RangeExclusive => "..<",
        }
    }
}

#[derive(NodeCopy!)]
pub enum Symbol {
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Colon,
    Semicolon,
    Arrow,
    SlashGt,
    LtSlash,
}

impl Symbol {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Arrow => "->",
            Self::SlashGt => "/>",
            Self::LtSlash => "</",
        }
    }
}
