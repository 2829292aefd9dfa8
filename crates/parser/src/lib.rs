//! Parser and resolver for a small Go dialect.
//!
//! - The lexer uses Logos and implements Go semicolon insertion.
//! - The parser is hand-written recursive descent. It binds identifiers to
//!   their declaring objects while parsing and returns an arena-backed tree.

pub mod ast;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod resolve;
pub mod scope;
pub mod walk;

// Re-exports for convenience
pub use ast::{Ast, File};
pub use config::{Mode, ParserConfig};
pub use error::{line_col, Diag, DiagKind, LexErrorKind, ParseError, Span};
pub use lexer::{Lexer, Tok};
pub use parser::Parser;
pub use printer::print_file;
pub use resolve::{resolve_universe, Universe};
pub use scope::{ObjKind, Object};

/// Parses `src` with the default configuration, including the deferred
/// resolution pass.
pub fn parse_file(filename: &str, src: &str) -> Result<File, ParseError> {
    parse_file_with(filename, src, ParserConfig::default())
}

pub fn parse_file_with(
    filename: &str,
    src: &str,
    config: ParserConfig,
) -> Result<File, ParseError> {
    Parser::new(filename, src, config)?.parse_file()
}
