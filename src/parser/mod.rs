//! Parser for the KerML/SysML textual notation.
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens
//!     ↓
//! Parser (recursive descent) → syntax::Member tree + ParseErrors
//! ```
//!
//! Both languages share one grammar; the SysML keywords (`part def`,
//! `attribute`, ...) and the KerML keywords (`classifier`, `feature`, ...)
//! are accepted in either file type.

mod expressions;
mod lexer;
#[allow(clippy::module_inception)]
mod parser;

pub use lexer::{Lexer, Token, TokenKind, tokenize};

use crate::syntax::{Expr, Member, ParseError};

/// Parse a document into its top-level members.
pub(crate) fn parse(source: &str) -> (Vec<Member>, Vec<ParseError>) {
    let mut parser = parser::Parser::new(source);
    let members = parser.parse_file();
    (members, parser.finish())
}

/// Parse a standalone expression such as `x + 1` or `Substring("abc", 1, 2)`.
pub fn parse_expression(source: &str) -> Result<Expr, Vec<ParseError>> {
    let mut parser = parser::Parser::new(source);
    let expr = parser.parse_expr();
    if expr.is_some() && !parser.at_eof() {
        parser.error("end of expression");
    }
    let errors = parser.finish();
    match expr {
        Some(expr) if errors.is_empty() => Ok(expr),
        _ => Err(errors),
    }
}
