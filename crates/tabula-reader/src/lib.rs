pub mod lexer;
pub mod parser;

use std::path::Path;

use tabula_solver::{Tableau, TableauError};
use thiserror::Error;

pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{ParseError, Parser};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Invalid tableau: {0}")]
    Tableau(#[from] TableauError),
}

/// Parses a matrix and builds its starting tableau.
pub fn load(source: &str) -> Result<Tableau, LoadError> {
    let problem = Parser::parse(source)?;
    Ok(Tableau::new(&problem)?)
}

pub fn load_file(path: impl AsRef<Path>) -> Result<Tableau, LoadError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .map_err(|e| LoadError::IoError(format!("{}: {}", path.display(), e)))?;
    load(&source)
}
