use std::str::FromStr;

use rust_decimal::Decimal;
use tabula_solver::Problem;
use thiserror::Error;
use tracing::debug;

use crate::lexer::{Lexer, Span, Token, TokenKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected input '{found}' on line {line} at position {span:?}")]
    UnexpectedCharacter { found: String, line: usize, span: Span },
    #[error("Invalid number '{text}' on line {line}")]
    InvalidNumber { text: String, line: usize },
    #[error("Constraint coefficients must be integers, found '{text}' on line {line}")]
    InvalidInteger { text: String, line: usize },
    #[error("Missing objective line")]
    MissingObjective,
    #[error("Constraint on line {line} needs at least one coefficient and a right-hand side")]
    MissingRhs { line: usize },
}

/// Reads the matrix format: a line of objective coefficients followed by
/// one line per "<=" constraint, each holding integer coefficients and a
/// trailing integer right-hand side.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    line: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            line: 1,
        }
    }

    pub fn parse(source: &str) -> Result<Problem, ParseError> {
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens);
        parser.parse_problem()
    }

    fn parse_problem(&mut self) -> Result<Problem, ParseError> {
        let (objective_line, objective) = loop {
            match self.next_line()? {
                None => return Err(ParseError::MissingObjective),
                Some((_, tokens)) if tokens.is_empty() => continue,
                Some(line) => break line,
            }
        };
        let objective = objective
            .iter()
            .map(|t| parse_decimal(t, objective_line))
            .collect::<Result<Vec<_>, _>>()?;

        let mut problem = Problem::new(objective);

        while let Some((line, tokens)) = self.next_line()? {
            if tokens.is_empty() {
                continue;
            }
            if tokens.len() < 2 {
                return Err(ParseError::MissingRhs { line });
            }
            let mut values = tokens
                .iter()
                .map(|t| parse_integer(t, line))
                .collect::<Result<Vec<_>, _>>()?;
            let rhs = values.pop().unwrap_or_default();
            problem.add_constraint(values, rhs);
        }

        debug!(
            component = "reader",
            operation = "parse",
            status = "success",
            variables = problem.num_variables(),
            constraints = problem.num_constraints(),
            "Parsed matrix"
        );

        Ok(problem)
    }

    /// Collects the number tokens of the next line, or `None` at end of input.
    fn next_line(&mut self) -> Result<Option<(usize, Vec<Token>)>, ParseError> {
        let line = self.line;
        let mut numbers = Vec::new();

        loop {
            let Some(token) = self.tokens.get(self.pos).cloned() else {
                break;
            };
            self.pos += 1;
            match token.kind {
                TokenKind::Number => numbers.push(token),
                TokenKind::Comment => {}
                TokenKind::Newline => {
                    self.line += 1;
                    return Ok(Some((line, numbers)));
                }
                TokenKind::Error => {
                    return Err(ParseError::UnexpectedCharacter {
                        found: token.text,
                        line,
                        span: token.span,
                    });
                }
                TokenKind::Eof => break,
            }
        }

        if numbers.is_empty() {
            Ok(None)
        } else {
            Ok(Some((line, numbers)))
        }
    }
}

fn parse_decimal(token: &Token, line: usize) -> Result<Decimal, ParseError> {
    Decimal::from_str(token.text.trim_start_matches('+')).map_err(|_| ParseError::InvalidNumber {
        text: token.text.clone(),
        line,
    })
}

fn parse_integer(token: &Token, line: usize) -> Result<Decimal, ParseError> {
    token
        .text
        .parse::<i64>()
        .map(Decimal::from)
        .map_err(|_| ParseError::InvalidInteger {
            text: token.text.clone(),
            line,
        })
}
