//! Expression parsing for KerML and SysML
//!
//! One function per precedence level, lowest first:
//!
//! ```text
//! Conditional → NullCoalescing → Implies → Or → Xor → And → Equality
//!     → Classification → Relational → Range → Additive → Multiplicative
//!     → Exponentiation → Unary → Postfix → Primary
//! ```

use super::lexer::TokenKind;
use super::parser::{Parser, unescape};
use crate::base::TextSize;
use crate::syntax::{BinaryOp, ClassifyOp, Expr, ExprKind, Literal, ParseErrorKind, UnaryOp};

type Level<'a> = fn(&mut Parser<'a>) -> Option<Expr>;

const NULL_COALESCING: &[(TokenKind, BinaryOp)] =
    &[(TokenKind::QuestionQuestion, BinaryOp::NullCoalesce)];
const IMPLIES: &[(TokenKind, BinaryOp)] = &[(TokenKind::ImpliesKw, BinaryOp::Implies)];
const OR: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::OrKw, BinaryOp::Or),
    (TokenKind::Pipe, BinaryOp::BitOr),
];
const XOR: &[(TokenKind, BinaryOp)] = &[(TokenKind::XorKw, BinaryOp::Xor)];
const AND: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::AndKw, BinaryOp::And),
    (TokenKind::Amp, BinaryOp::BitAnd),
];
const EQUALITY: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::EqEq, BinaryOp::Eq),
    (TokenKind::BangEq, BinaryOp::Ne),
    (TokenKind::EqEqEq, BinaryOp::Same),
    (TokenKind::BangEqEq, BinaryOp::NotSame),
];
const RELATIONAL: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Lt, BinaryOp::Lt),
    (TokenKind::Gt, BinaryOp::Gt),
    (TokenKind::LtEq, BinaryOp::Le),
    (TokenKind::GtEq, BinaryOp::Ge),
];
const ADDITIVE: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Plus, BinaryOp::Add),
    (TokenKind::Minus, BinaryOp::Sub),
];
const MULTIPLICATIVE: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Star, BinaryOp::Mul),
    (TokenKind::Slash, BinaryOp::Div),
    (TokenKind::Percent, BinaryOp::Rem),
];

fn classify_op(kind: TokenKind) -> Option<ClassifyOp> {
    match kind {
        TokenKind::HastypeKw => Some(ClassifyOp::HasType),
        TokenKind::IstypeKw => Some(ClassifyOp::IsType),
        TokenKind::At => Some(ClassifyOp::Classifies),
        TokenKind::AtAt => Some(ClassifyOp::MetaClassifies),
        TokenKind::AsKw => Some(ClassifyOp::As),
        TokenKind::MetaKw => Some(ClassifyOp::Meta),
        _ => None,
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let range = lhs.range.cover(rhs.range);
    Expr::new(
        ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        range,
    )
}

impl<'a> Parser<'a> {
    /// Entry point for all expressions.
    pub(super) fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_conditional()
    }

    /// Conditional = 'if' NullCoalescing '?' Expr 'else' Expr | NullCoalescing
    fn parse_conditional(&mut self) -> Option<Expr> {
        if !self.at(TokenKind::IfKw) {
            return self.parse_null_coalescing();
        }
        let start = self.start();
        self.bump();
        let cond = self.parse_null_coalescing()?;
        self.expect(TokenKind::Question, "'?'")?;
        let then = self.parse_expr()?;
        self.expect(TokenKind::ElseKw, "'else'")?;
        let otherwise = self.parse_expr()?;
        Some(Expr::new(
            ExprKind::If {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            },
            self.range_from(start),
        ))
    }

    /// Left-associative binary level over `ops`, with operands from `next`.
    fn parse_left_assoc(
        &mut self,
        ops: &[(TokenKind, BinaryOp)],
        next: Level<'a>,
    ) -> Option<Expr> {
        let mut lhs = next(self)?;
        while let Some(op) = self
            .current_kind()
            .and_then(|k| ops.iter().find(|(t, _)| *t == k).map(|(_, op)| *op))
        {
            self.bump();
            let rhs = next(self)?;
            lhs = binary(op, lhs, rhs);
        }
        Some(lhs)
    }

    fn parse_null_coalescing(&mut self) -> Option<Expr> {
        self.parse_left_assoc(NULL_COALESCING, Self::parse_implies)
    }

    fn parse_implies(&mut self) -> Option<Expr> {
        self.parse_left_assoc(IMPLIES, Self::parse_or)
    }

    fn parse_or(&mut self) -> Option<Expr> {
        self.parse_left_assoc(OR, Self::parse_xor)
    }

    fn parse_xor(&mut self) -> Option<Expr> {
        self.parse_left_assoc(XOR, Self::parse_and)
    }

    fn parse_and(&mut self) -> Option<Expr> {
        self.parse_left_assoc(AND, Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Option<Expr> {
        self.parse_left_assoc(EQUALITY, Self::parse_classification)
    }

    /// Classification = Relational (ClassifyOp QualifiedName)?
    fn parse_classification(&mut self) -> Option<Expr> {
        let operand = self.parse_relational()?;
        let Some(op) = self.current_kind().and_then(classify_op) else {
            return Some(operand);
        };
        self.bump();
        let ty = self.parse_path()?;
        let range = operand.range.cover(ty.range);
        Some(Expr::new(
            ExprKind::Classify {
                op,
                operand: Some(Box::new(operand)),
                ty,
            },
            range,
        ))
    }

    fn parse_relational(&mut self) -> Option<Expr> {
        self.parse_left_assoc(RELATIONAL, Self::parse_range)
    }

    /// Range = Additive ('..' Additive)?
    fn parse_range(&mut self) -> Option<Expr> {
        let lhs = self.parse_additive()?;
        if !self.eat(TokenKind::DotDot) {
            return Some(lhs);
        }
        let rhs = self.parse_additive()?;
        Some(binary(BinaryOp::Range, lhs, rhs))
    }

    fn parse_additive(&mut self) -> Option<Expr> {
        self.parse_left_assoc(ADDITIVE, Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Option<Expr> {
        self.parse_left_assoc(MULTIPLICATIVE, Self::parse_exponentiation)
    }

    /// Exponentiation = Unary (('^' | '**') Exponentiation)?
    fn parse_exponentiation(&mut self) -> Option<Expr> {
        let lhs = self.parse_unary()?;
        if !self.at_any(&[TokenKind::Caret, TokenKind::StarStar]) {
            return Some(lhs);
        }
        self.bump();
        let rhs = self.parse_exponentiation()?;
        Some(binary(BinaryOp::Pow, lhs, rhs))
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        let op = match self.current_kind() {
            Some(TokenKind::Minus) => UnaryOp::Neg,
            Some(TokenKind::Plus) => UnaryOp::Plus,
            Some(TokenKind::NotKw) => UnaryOp::Not,
            Some(TokenKind::Tilde) => UnaryOp::BitNot,
            _ => return self.parse_postfix(),
        };
        let start = self.start();
        self.bump();
        let operand = self.parse_unary()?;
        Some(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            self.range_from(start),
        ))
    }

    /// Postfix = Primary ('.' Name | '[' Expr ']' | '#' '(' Expr ')' | '->' Name Args)*
    fn parse_postfix(&mut self) -> Option<Expr> {
        let start = self.start();
        let mut expr = self.parse_primary()?;
        loop {
            match self.current_kind() {
                Some(TokenKind::Dot) if self.nth_kind(1).is_some_and(TokenKind::is_name) => {
                    self.bump();
                    let member = self.parse_name()?;
                    expr = Expr::new(
                        ExprKind::Member {
                            base: Box::new(expr),
                            member,
                        },
                        self.range_from(start),
                    );
                }
                Some(TokenKind::LBracket) => {
                    self.bump();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = self.index(expr, index, start);
                }
                Some(TokenKind::Hash) if self.nth_kind(1) == Some(TokenKind::LParen) => {
                    self.bump();
                    self.bump();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RParen, "')'")?;
                    expr = self.index(expr, index, start);
                }
                Some(TokenKind::Arrow) => {
                    // `xs->size()` invokes `size(xs)`.
                    self.bump();
                    let callee = self.parse_path()?;
                    let mut args = vec![expr];
                    args.extend(self.parse_arguments()?);
                    expr = Expr::new(ExprKind::Invoke { callee, args }, self.range_from(start));
                }
                _ => return Some(expr),
            }
        }
    }

    fn index(&self, base: Expr, index: Expr, start: TextSize) -> Expr {
        Expr::new(
            ExprKind::Index {
                base: Box::new(base),
                index: Box::new(index),
            },
            self.range_from(start),
        )
    }

    /// Arguments = '(' (Expr (',' Expr)*)? ')'
    fn parse_arguments(&mut self) -> Option<Vec<Expr>> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if self.eat(TokenKind::RParen) {
            return Some(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Some(args)
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let start = self.start();
        let Some(token) = self.current() else {
            self.error("an expression");
            return None;
        };
        let literal = match token.kind {
            TokenKind::Integer => Some(match token.text.parse::<i64>() {
                Ok(n) => Literal::Integer(n),
                Err(_) => {
                    self.push_error(ParseErrorKind::InvalidNumber(token.text.to_string()), token.range);
                    Literal::Null
                }
            }),
            TokenKind::Real => Some(match token.text.parse::<f64>() {
                Ok(x) => Literal::Real(x),
                Err(_) => {
                    self.push_error(ParseErrorKind::InvalidNumber(token.text.to_string()), token.range);
                    Literal::Null
                }
            }),
            TokenKind::String => {
                let inner = &token.text[1..token.text.len() - 1];
                Some(Literal::String(unescape(inner).into()))
            }
            TokenKind::TrueKw => Some(Literal::Bool(true)),
            TokenKind::FalseKw => Some(Literal::Bool(false)),
            TokenKind::NullKw => Some(Literal::Null),
            TokenKind::Star => Some(Literal::Infinity),
            _ => None,
        };
        if let Some(literal) = literal {
            self.bump();
            return Some(Expr::new(ExprKind::Literal(literal), token.range));
        }

        if let Some(op) = classify_op(token.kind) {
            // Operand-less classification tests the evaluation subject.
            self.bump();
            let ty = self.parse_path()?;
            return Some(Expr::new(
                ExprKind::Classify {
                    op,
                    operand: None,
                    ty,
                },
                self.range_from(start),
            ));
        }

        match token.kind {
            TokenKind::LParen => self.parse_parenthesized(),
            kind if kind.is_name() => {
                let name = self.parse_path()?;
                if self.at(TokenKind::LParen) {
                    let args = self.parse_arguments()?;
                    Some(Expr::new(
                        ExprKind::Invoke { callee: name, args },
                        self.range_from(start),
                    ))
                } else {
                    let range = name.range;
                    Some(Expr::new(ExprKind::Name(name), range))
                }
            }
            _ => {
                self.error("an expression");
                None
            }
        }
    }

    /// `()` is null, `(e)` is `e`, `(a, b, ...)` is a sequence.
    fn parse_parenthesized(&mut self) -> Option<Expr> {
        let start = self.start();
        self.bump();
        if self.eat(TokenKind::RParen) {
            return Some(Expr::new(
                ExprKind::Literal(Literal::Null),
                self.range_from(start),
            ));
        }
        let first = self.parse_expr()?;
        if !self.at(TokenKind::Comma) {
            self.expect(TokenKind::RParen, "')'")?;
            return Some(first);
        }
        let mut items = vec![first];
        while self.eat(TokenKind::Comma) {
            items.push(self.parse_expr()?);
        }
        self.expect(TokenKind::RParen, "')'")?;
        Some(Expr::new(ExprKind::Sequence(items), self.range_from(start)))
    }
}
