use super::{ParseResult, Parser, SyntaxError, SyntaxErrorKind};
use crate::ast::*;
use crate::token::*;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Lowest,

    LogicalOr,
    LogicalAnd,

    Equality,
    Relational,

    Range,

    Additive,
    Multiplicative,
}

fn binop_prec(binop: BinOp) -> Prec {
    match binop {
        BinOp::LogicalOr => Prec::LogicalOr,
        BinOp::LogicalAnd => Prec::LogicalAnd,

        BinOp::Eq | BinOp::NotEq => Prec::Equality,
        BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => Prec::Relational,

        BinOp::RangeInclusive | BinOp::RangeExclusive => Prec::Range,

        BinOp::Add | BinOp::Sub => Prec::Additive,
        BinOp::Mul | BinOp::Div | BinOp::Rem => Prec::Multiplicative,
    }
}

fn binop_for(op: Operator) -> Option<BinOp> {
    let binop = match op {
        Operator::OrOr => BinOp::LogicalOr,
        Operator::AndAnd => BinOp::LogicalAnd,

        Operator::EqEq => BinOp::Eq,
        Operator::NotEq => BinOp::NotEq,

        Operator::Lt => BinOp::Lt,
        Operator::LtEq => BinOp::LtEq,
        Operator::Gt => BinOp::Gt,
        Operator::GtEq => BinOp::GtEq,

        Operator::RangeInclusive => BinOp::RangeInclusive,
        Operator::RangeExclusive => BinOp::RangeExclusive,

        Operator::Add => BinOp::Add,
        Operator::Sub => BinOp::Sub,

        Operator::Mul => BinOp::Mul,
        Operator::Div => BinOp::Div,
        Operator::Rem => BinOp::Rem,

        _ => return None,
    };

    Some(binop)
}

impl Parser<'_> {
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_prec(Prec::Lowest)
    }

    // Every level is left associative: the right operand is parsed at the
    // operator's own level, so an equal-level operator stops it.
    fn parse_prec(&mut self, prec: Prec) -> ParseResult<Expr> {
        let mut expr = self.parse_unary()?;

        while let Some(op) = self.peek_bin_op(prec) {
            self.bump()?;
            self.skip_newlines()?;

            let rhs = self.parse_prec(binop_prec(op))?;

            let span = expr.span.union(rhs.span);
            expr = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(expr),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        Ok(expr)
    }

    fn peek_bin_op(&self, prec: Prec) -> Option<BinOp> {
        let op = match self.peek_kind()? {
            TokenKind::Operator(op) => binop_for(op)?,
            _ => return None,
        };

        (binop_prec(op) > prec).then_some(op)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let (op, op_span) = match self.peek() {
            Some(t) if t.kind == TokenKind::Operator(Operator::Bang) => (UnOp::Not, t.span),
            Some(t) if t.kind == TokenKind::Operator(Operator::Sub) => (UnOp::Negate, t.span),
            _ => return self.parse_primary(),
        };

        self.bump()?;

        // `i64::MIN` has no positive counterpart, so a negated integer
        // literal is read with its sign.
        if op == UnOp::Negate {
            if let Some(token) = self.peek().filter(|t| t.kind == TokenKind::Integer) {
                let value = format!("-{}", token.text)
                    .parse::<i64>()
                    .map_err(|_| self.invalid_literal("integer literal", token))?;

                self.bump()?;
                return Ok(Expr::new(
                    ExprKind::Literal(Literal::Integer(value)),
                    op_span.union(token.span),
                ));
            }
        }

        let operand = self.parse_primary()?;
        let span = op_span.union(operand.span);

        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some(token) = self.peek() else {
            return Err(self.error_expected("an expression"));
        };

        match token.kind {
            TokenKind::Identifier => {
                self.bump()?;

                if self.at(TokenKind::Symbol(Symbol::LParen)) {
                    let name = Ident::new(token.text, token.span);
                    return self.parse_call(name);
                }

                Ok(Expr::new(
                    ExprKind::Identifier(token.text.to_owned()),
                    token.span,
                ))
            }

            TokenKind::Integer => {
                let value = token
                    .text
                    .parse::<i64>()
                    .map_err(|_| self.invalid_literal("integer literal", token))?;

                self.bump()?;
                Ok(Expr::new(
                    ExprKind::Literal(Literal::Integer(value)),
                    token.span,
                ))
            }

            TokenKind::Float => {
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| self.invalid_literal("float literal", token))?;

                self.bump()?;
                Ok(Expr::new(
                    ExprKind::Literal(Literal::Float(value)),
                    token.span,
                ))
            }

            TokenKind::Bool => {
                self.bump()?;
                Ok(Expr::new(
                    ExprKind::Literal(Literal::Bool(token.text == "true")),
                    token.span,
                ))
            }

            TokenKind::Symbol(Symbol::LParen) => {
                self.bump()?;
                self.skip_newlines()?;

                let inner = self.with_children_allowed(true, Self::parse_expr)?;

                self.skip_newlines()?;
                let close = self.expect(TokenKind::Symbol(Symbol::RParen))?;

                Ok(Expr::new(inner.kind, token.span.union(close.span)))
            }

            TokenKind::Keyword(Keyword::If) => self.parse_if(),

            _ => Err(self.error_expected("an expression")),
        }
    }

    fn parse_call(&mut self, name: Ident) -> ParseResult<Expr> {
        self.expect(TokenKind::Symbol(Symbol::LParen))?;
        self.skip_newlines()?;

        let mut arguments = vec![];
        while self.at(TokenKind::Identifier) {
            let label = self.parse_ident()?;
            self.expect(TokenKind::Symbol(Symbol::Colon))?;

            let value = self.with_children_allowed(true, Self::parse_expr)?;
            arguments.push(CallArgument { label, value });

            self.skip_newlines()?;
            if !self.eat(TokenKind::Symbol(Symbol::Comma))? {
                break;
            }
            self.skip_newlines()?;
        }

        let close = self.expect(TokenKind::Symbol(Symbol::RParen))?;
        let mut span = name.span.union(close.span);

        let children = if self.allow_children && self.at(TokenKind::Symbol(Symbol::LBrace)) {
            let children = self.parse_children()?;
            span = span.union(self.prev_span);
            Some(children)
        } else {
            None
        };

        Ok(Expr::new(
            ExprKind::Call(FunctionCall {
                name,
                arguments,
                children,
            }),
            span,
        ))
    }

    fn parse_children(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect(TokenKind::Symbol(Symbol::LBrace))?;
        self.skip_newlines()?;

        let mut children = vec![];
        while !self.at_end() && !self.at(TokenKind::Symbol(Symbol::RBrace)) {
            children.push(self.parse_expr()?);

            if !self.at(TokenKind::Newline) {
                break;
            }
            self.skip_newlines()?;
        }

        self.expect(TokenKind::Symbol(Symbol::RBrace))?;
        Ok(children)
    }

    fn parse_if(&mut self) -> ParseResult<Expr> {
        let if_token = self.expect(TokenKind::Keyword(Keyword::If))?;

        let condition = self.with_children_allowed(false, Self::parse_expr)?;
        let then_block = self.parse_block()?;

        let else_block = if self.eat(TokenKind::Keyword(Keyword::Else))? {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Expr::new(
            ExprKind::If {
                condition: Box::new(condition),
                then_block,
                else_block,
            },
            if_token.span.union(self.prev_span),
        ))
    }

    fn invalid_literal(&self, kind: &'static str, token: Token) -> SyntaxError {
        self.error_at(
            SyntaxErrorKind::InvalidLiteral {
                kind,
                text: token.text.to_owned(),
            },
            token.span,
            token.line,
            token.column,
        )
    }
}
