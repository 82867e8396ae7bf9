use thiserror::Error;

/// Errors raised while building or addressing a [`Tableau`](crate::Tableau).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableauError {
    #[error("Unknown basis row: {0}")]
    UnknownRow(usize),
    #[error("Unknown variable column: {0}")]
    UnknownColumn(usize),
    #[error("Problem has no decision variables")]
    NoVariables,
    #[error("Problem has no constraints")]
    NoConstraints,
    #[error("Constraint {row} has {found} coefficients, expected {decision} or {full}")]
    DimensionMismatch {
        row: usize,
        found: usize,
        decision: usize,
        full: usize,
    },
    #[error("Constraint {row} has a negative right-hand side ({rhs}); the starting basis would be infeasible")]
    NegativeRhs { row: usize, rhs: String },
    #[error("Tableau {part} has {found} entries, expected {expected}")]
    ShapeMismatch {
        part: &'static str,
        found: usize,
        expected: usize,
    },
    #[error("Pivot element at row {row}, column {column} is zero")]
    ZeroPivot { row: usize, column: usize },
    /// `row` equal to the row count is the objective row; `column` equal to
    /// the column count is the right-hand side.
    #[error("Arithmetic overflow at row {row}, column {column}")]
    Overflow { row: usize, column: usize },
}

/// Terminal failures of a solve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("LP is unbounded or degenerate: no eligible leaving row for entering variable {variable} (iteration {iteration})")]
    Unbounded { variable: String, iteration: usize },
    #[error("Iteration limit of {limit} pivots reached without reaching optimality")]
    IterationLimit { limit: usize },
    #[error(transparent)]
    Tableau(#[from] TableauError),
}
