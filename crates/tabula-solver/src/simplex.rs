use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::engine;
use crate::error::SolveError;
use crate::selector::{self, RatioTest};
use crate::tableau::{RowId, Tableau, VarId};

/// Tableau Simplex solver for "<=" problems with a feasible slack basis.
///
/// Entering and leaving choices take the first candidate on ties. There is
/// no anti-cycling rule, so a cycling problem loops until
/// [`Solver::with_max_iterations`] stops it.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    /// Rule used to pick the leaving row
    ratio_test: RatioTest,
    /// Pivot cap; `None` runs until optimal or failed
    max_iterations: Option<usize>,
}

/// One pivot applied by the solver.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    /// 1-based pivot counter within a solve (always 1 for a lone [`Solver::step`])
    pub iteration: usize,
    pub entering: VarId,
    pub leaving: RowId,
    /// Name of the variable that entered the basis
    pub entering_name: String,
    /// Name of the variable that left the basis
    pub leaving_name: String,
    pub pivot_element: Decimal,
    /// Objective value after the pivot
    pub objective_value: Decimal,
}

/// Outcome of a single [`Solver::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// No reduced cost is negative; nothing was changed
    Optimal,
    /// A pivot was applied and the solve is still running
    Pivoted(Pivot),
}

/// A tableau that reached optimality.
#[derive(Debug, Clone)]
pub struct Solved {
    pub tableau: Tableau,
    /// Number of pivots performed
    pub pivots: usize,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ratio_test(mut self, rule: RatioTest) -> Self {
        self.ratio_test = rule;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    pub fn ratio_test(&self) -> RatioTest {
        self.ratio_test
    }

    /// Run pivots until the tableau is optimal.
    pub fn solve(&self, tableau: Tableau) -> Result<Solved, SolveError> {
        self.solve_with(tableau, |_, _| {})
    }

    /// Like [`Solver::solve`], calling `observer` with every pivot and the
    /// tableau as it stands right after it.
    pub fn solve_with<F>(&self, mut tableau: Tableau, mut observer: F) -> Result<Solved, SolveError>
    where
        F: FnMut(&Pivot, &Tableau),
    {
        let mut pivots = 0;

        loop {
            if let Some(limit) = self.max_iterations {
                if pivots >= limit && !tableau.is_optimal() {
                    return Err(SolveError::IterationLimit { limit });
                }
            }

            match self.pivot_once(&mut tableau, pivots + 1)? {
                Step::Optimal => break,
                Step::Pivoted(pivot) => {
                    pivots += 1;
                    observer(&pivot, &tableau);
                }
            }
        }

        debug!(
            component = "simplex",
            operation = "solve",
            status = "optimal",
            pivots,
            objective_value = %tableau.objective_value(),
            "Reached optimal tableau"
        );

        Ok(Solved { tableau, pivots })
    }

    /// Perform one transition: report optimality, or select and apply a pivot.
    pub fn step(&self, tableau: &mut Tableau) -> Result<Step, SolveError> {
        self.pivot_once(tableau, 1)
    }

    fn pivot_once(&self, tableau: &mut Tableau, iteration: usize) -> Result<Step, SolveError> {
        let Some(entering) = selector::select_entering_column(tableau.objective_row()) else {
            return Ok(Step::Optimal);
        };
        let entering_name = tableau.variable(entering)?.name.clone();
        trace!(
            component = "simplex",
            operation = "select_entering",
            iteration,
            entering = %entering_name,
            "Selected entering variable"
        );

        let Some(leaving) = selector::select_leaving_row(tableau, entering, self.ratio_test)? else {
            debug!(
                component = "simplex",
                operation = "select_leaving",
                status = "failed",
                iteration,
                entering = %entering_name,
                "No eligible leaving row"
            );
            return Err(SolveError::Unbounded {
                variable: entering_name,
                iteration,
            });
        };

        let leaving_name = tableau.row_name(leaving)?.to_string();
        let pivot_element = tableau.cell(leaving, entering)?;

        engine::pivot(tableau, leaving, entering)?;

        let objective_value = tableau.objective_value();
        debug!(
            component = "simplex",
            operation = "pivot",
            status = "success",
            iteration,
            entering = %entering_name,
            leaving = %leaving_name,
            %pivot_element,
            %objective_value,
            "Applied pivot"
        );

        Ok(Step::Pivoted(Pivot {
            iteration,
            entering,
            leaving,
            entering_name,
            leaving_name,
            pivot_element,
            objective_value,
        }))
    }
}
