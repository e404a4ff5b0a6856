//! Interpreter for a small imperative language written in Sichuan-dialect
//! vocabulary.
//!
//! The public surface is deliberately small: [`run`] takes source text and
//! returns either everything the program printed, or an [`InterpError`]
//! carrying whatever had already been printed before the failure.

pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;

pub use error::InterpError;

use log::debug;

/// Lexes, parses, and evaluates `program`, end to end.
pub fn run(program: &str) -> Result<String, InterpError> {
    debug!("lexing {} byte(s) of source", program.len());
    let tokens = lexer::lex(program);

    debug!("parsing {} token(s)", tokens.len());
    let stmts = parser::parse(tokens)?;

    debug!("evaluating {} top-level statement(s)", stmts.len());
    interpreter::run(&stmts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greets() {
        let output = run("摆哈儿：“你好”。").unwrap();
        assert_eq!(output, "你好\n");
    }

    #[test]
    fn parse_error_surfaces_as_interp_error() {
        let err = run("凶得很").unwrap_err();
        assert!(matches!(err, InterpError::Parse(_)));
    }
}
