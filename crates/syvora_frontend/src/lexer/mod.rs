#[cfg(test)]
mod tests;

use syvora_diagnostic::Span;

use crate::token::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub kind: LexerErrorKind,
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated block comment")]
    UnterminatedComment,
}

pub type LexerResult<T> = Result<T, LexerErrorKind>;

/// Multi-character clusters, longest first.
const CLUSTERS: &[(&str, TokenKind)] = &[
    ("...", TokenKind::Operator(Operator::RangeInclusive)),
    ("..<", TokenKind::Operator(Operator::RangeExclusive)),
    ("->", TokenKind::Symbol(Symbol::Arrow)),
    ("/>", TokenKind::Symbol(Symbol::SlashGt)),
    ("</", TokenKind::Symbol(Symbol::LtSlash)),
    ("==", TokenKind::Operator(Operator::EqEq)),
    ("!=", TokenKind::Operator(Operator::NotEq)),
    ("<=", TokenKind::Operator(Operator::LtEq)),
    (">=", TokenKind::Operator(Operator::GtEq)),
    ("&&", TokenKind::Operator(Operator::AndAnd)),
    ("||", TokenKind::Operator(Operator::OrOr)),
];

/// Lazily scans a source text into tokens.
///
/// Whitespace and comments are recognised but skipped unless the lexer was
/// built with [`Lexer::with_trivia`]. The first error ends the stream.
pub struct Lexer<'src> {
    all: &'src str,
    file: &'src str,

    pos: usize,
    line: usize,
    column: usize,

    keep_trivia: bool,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, file: &'src str) -> Self {
        Self {
            all: source,
            file,

            pos: 0,
            line: 1,
            column: 1,

            keep_trivia: false,
            finished: false,
        }
    }

    #[must_use]
    pub fn with_trivia(mut self) -> Self {
        self.keep_trivia = true;
        self
    }

    pub fn file(&self) -> &'src str {
        self.file
    }

    /// Span, line and column of the end of the input.
    pub fn eof_position(&self) -> (Span, usize, usize) {
        (Span::empty(self.pos), self.line, self.column)
    }

    fn scan_token(&mut self) -> Result<Token<'src>, LexerError> {
        let rest = &self.all[self.pos..];

        let (kind, len) = match scan_kind(rest) {
            Ok(matched) => matched,
            Err(kind) => {
                let bad_len = rest.chars().next().map_or(0, char::len_utf8);
                return Err(LexerError {
                    kind,
                    span: Span::new(self.pos, self.pos + bad_len),
                    line: self.line,
                    column: self.column,
                });
            }
        };

        let text = &rest[..len];
        let token = Token {
            kind,
            text,
            span: Span::new(self.pos, self.pos + len),
            line: self.line,
            column: self.column,
            file: self.file,
        };

        self.advance(text);
        Ok(token)
    }

    fn advance(&mut self, text: &str) {
        self.pos += text.len();

        match text.rfind('\n') {
            Some(last_newline) => {
                self.line += text.matches('\n').count();
                self.column = 1 + text[last_newline + 1..].chars().count();
            }
            None => self.column += text.chars().count(),
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token<'src>, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            if self.pos >= self.all.len() {
                self.finished = true;
                break;
            }

            match self.scan_token() {
                Ok(token) if token.kind.is_trivia() && !self.keep_trivia => continue,
                Ok(token) => return Some(Ok(token)),
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }

        None
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Classify the token at the start of `rest` and return its byte length.
/// `rest` must not be empty.
fn scan_kind(rest: &str) -> LexerResult<(TokenKind, usize)> {
    let Some(first) = rest.chars().next() else {
        return Err(LexerErrorKind::UnexpectedChar('\0'));
    };

    let matched = match first {
        ch if is_word_start(ch) => {
            let len = take_while(rest, is_word);
            let word = &rest[..len];

            let kind = if let Some(kw) = Keyword::from_word(word) {
                TokenKind::Keyword(kw)
            } else if word == "true" || word == "false" {
                TokenKind::Bool
            } else if ch.is_ascii_uppercase() {
                TokenKind::TypeName
            } else {
                TokenKind::Identifier
            };

            (kind, len)
        }

        '0'..='9' => {
            let int_len = take_while(rest, |ch| ch.is_ascii_digit());
            let after = &rest[int_len..];

            let frac_len = after
                .strip_prefix('.')
                .map_or(0, |frac| take_while(frac, |ch| ch.is_ascii_digit()));

            if frac_len > 0 {
                (TokenKind::Float, int_len + 1 + frac_len)
            } else {
                (TokenKind::Integer, int_len)
            }
        }

        '"' => (TokenKind::String, scan_string(rest)?),

        ' ' | '\t' | '\r' => (
            TokenKind::Whitespace,
            take_while(rest, |ch| matches!(ch, ' ' | '\t' | '\r')),
        ),

        '\n' => (TokenKind::Newline, 1),

        '/' if rest.starts_with("//") => (
            TokenKind::Comment,
            rest.find('\n').unwrap_or(rest.len()),
        ),

        '/' if rest.starts_with("/*") => match rest[2..].find("*/") {
            Some(end) => (TokenKind::Comment, end + 4),
            None => return Err(LexerErrorKind::UnterminatedComment),
        },

        _ => {
            if let Some(&(cluster, kind)) = CLUSTERS.iter().find(|(c, _)| rest.starts_with(c)) {
                (kind, cluster.len())
            } else {
                let kind = single_char_kind(first).ok_or(LexerErrorKind::UnexpectedChar(first))?;
                (kind, first.len_utf8())
            }
        }
    };

    Ok(matched)
}

fn scan_string(rest: &str) -> LexerResult<usize> {
    let mut chars = rest.char_indices().skip(1);

    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => return Ok(i + 1),
            '\\' => {
                chars.next();
            }
            _ => {}
        }
    }

    Err(LexerErrorKind::UnterminatedString)
}

fn single_char_kind(ch: char) -> Option<TokenKind> {
    let kind = match ch {
        '{' => TokenKind::Symbol(Symbol::LBrace),
        '}' => TokenKind::Symbol(Symbol::RBrace),
        '(' => TokenKind::Symbol(Symbol::LParen),
        ')' => TokenKind::Symbol(Symbol::RParen),
        '[' => TokenKind::Symbol(Symbol::LBracket),
        ']' => TokenKind::Symbol(Symbol::RBracket),
        ',' => TokenKind::Symbol(Symbol::Comma),
        '.' => TokenKind::Symbol(Symbol::Dot),
        ':' => TokenKind::Symbol(Symbol::Colon),
        ';' => TokenKind::Symbol(Symbol::Semicolon),

        '+' => TokenKind::Operator(Operator::Add),
        '-' => TokenKind::Operator(Operator::Sub),
        '*' => TokenKind::Operator(Operator::Mul),
        '/' => TokenKind::Operator(Operator::Div),
        '%' => TokenKind::Operator(Operator::Rem),
        '^' => TokenKind::Operator(Operator::Caret),
        '!' => TokenKind::Operator(Operator::Bang),
        '=' => TokenKind::Operator(Operator::Assign),
        '<' => TokenKind::Operator(Operator::Lt),
        '>' => TokenKind::Operator(Operator::Gt),
        '&' => TokenKind::Operator(Operator::Amp),
        '|' => TokenKind::Operator(Operator::Pipe),

        _ => return None,
    };

    Some(kind)
}

fn take_while(s: &str, f: impl Fn(char) -> bool) -> usize {
    s.find(|ch| !f(ch)).unwrap_or(s.len())
}

fn is_word_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_word(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
