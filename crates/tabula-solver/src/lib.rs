mod engine;
mod error;
mod problem;
mod selector;
mod simplex;
mod solution;
mod tableau;

pub use engine::pivot;
pub use error::{SolveError, TableauError};
pub use problem::{Constraint, Problem};
pub use selector::{select_entering_column, select_leaving_row, RatioTest};
pub use simplex::{Pivot, Solved, Solver, Step};
pub use solution::{BasicValue, Summary};
pub use tableau::{round, BasisRow, RowId, Tableau, VarId, Variable, VariableKind, PRECISION};
