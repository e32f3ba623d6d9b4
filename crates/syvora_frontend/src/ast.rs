use std::fmt;

use syvora_diagnostic::Span;

use crate::{Node, NodeCopy};

/// Overload-disambiguating name: `name` followed by `_` and the argument
/// labels joined by `-`, in order.
pub fn mangle<'a>(name: &str, labels: impl IntoIterator<Item = &'a str>) -> String {
    let labels: Vec<&str> = labels.into_iter().collect();
    format!("{name}_{}", labels.join("-"))
}

#[derive(Node!)]
pub struct Module {
    pub functions: Vec<FunctionDeclaration>,
}

#[derive(Node!)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

#[derive(Node!)]
pub struct FunctionDeclaration {
    pub name: Ident,
    pub arguments: Vec<Argument>,
    pub return_type: Option<AccessibleTypeExpression>,
    pub body: Block,
}

impl FunctionDeclaration {
    pub fn low_level_name(&self) -> String {
        mangle(
            &self.name.name,
            self.arguments.iter().map(|arg| arg.identifier.name.as_str()),
        )
    }
}

#[derive(Node!)]
pub struct Argument {
    pub identifier: Ident,
    pub ty: AccessibleTypeExpression,
}

/// A possibly dotted type path such as `Int` or `Geometry.Point`.
#[derive(Node!)]
pub struct AccessibleTypeExpression {
    pub name: String,
    pub child: Option<Box<AccessibleTypeExpression>>,
    pub span: Span,
}

impl AccessibleTypeExpression {
    pub fn simple(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            child: None,
            span,
        }
    }
}

impl fmt::Display for AccessibleTypeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(child) = &self.child {
            write!(f, ".{child}")?;
        }
        Ok(())
    }
}

#[derive(Node!, Default)]
pub struct Block {
    pub statements: Vec<Expr>,
    pub return_expression: Option<Box<Expr>>,
}

#[derive(Node!)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Node!)]
pub enum ExprKind {
    If {
        condition: Box<Expr>,
        then_block: Block,
        else_block: Option<Block>,
    },

    Call(FunctionCall),

    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },

    Identifier(String),

    Literal(Literal),
}

#[derive(Node!)]
pub struct FunctionCall {
    pub name: Ident,
    pub arguments: Vec<CallArgument>,
    pub children: Option<Vec<Expr>>,
}

impl FunctionCall {
    pub fn low_level_name(&self) -> String {
        mangle(
            &self.name.name,
            self.arguments.iter().map(|arg| arg.label.name.as_str()),
        )
    }
}

#[derive(Node!)]
pub struct CallArgument {
    pub label: Ident,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Bool(bool),
}

#[derive(NodeCopy!)]
pub enum BinOp {
    LogicalOr,
    LogicalAnd,

    Eq,
    NotEq,

    Lt,
    LtEq,
    Gt,
    GtEq,

    RangeInclusive,
    RangeExclusive,

    Add,
    Sub,

    Mul,
    Div,
    Rem,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LogicalOr => "||",
            Self::LogicalAnd => "&&",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::RangeInclusive => "...",
            Self::RangeExclusive => "..<",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
        }
    }
}

#[derive(NodeCopy!)]
pub enum UnOp {
    Not,
    Negate,
}

impl UnOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Negate => "-",
        }
    }
}

// Parenthesised renderings, used in tests and debug logging.

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::If {
                condition,
                then_block,
                else_block,
            } => {
                write!(f, "(if {condition} {then_block}")?;
                if let Some(else_block) = else_block {
                    write!(f, " else {else_block}")?;
                }
                write!(f, ")")
            }

            ExprKind::Call(call) => {
                write!(f, "{}(", call.name.name)?;
                for (i, arg) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", arg.label.name, arg.value)?;
                }
                write!(f, ")")?;

                if let Some(children) = &call.children {
                    write!(f, " {{")?;
                    for child in children {
                        write!(f, " {child}")?;
                    }
                    write!(f, " }}")?;
                }

                Ok(())
            }

            ExprKind::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.as_str()),
            ExprKind::Unary { op, operand } => write!(f, "({}{operand})", op.as_str()),
            ExprKind::Identifier(name) => write!(f, "{name}"),
            ExprKind::Literal(literal) => write!(f, "{literal}"),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for statement in &self.statements {
            write!(f, " {statement};")?;
        }
        if let Some(expr) = &self.return_expression {
            write!(f, " return {expr}")?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}
