use rust_decimal::Decimal;

use crate::error::TableauError;
use crate::problem::Problem;

/// Number of fractional digits kept after every write.
pub const PRECISION: u32 = 2;

/// Rounds a value to [`PRECISION`] fractional digits (midpoints go to the even neighbour).
///
/// Zero results are always returned as positive zero.
pub fn round(value: Decimal) -> Decimal {
    let rounded = value.round_dp(PRECISION);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Column index of a variable. Assigned once at construction and never reused.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Zero-based column position.
    pub fn index(self) -> usize {
        self.0
    }

    /// One-based ordinal, as used in the variable's display name.
    pub fn ordinal(self) -> usize {
        self.0 + 1
    }
}

/// Row index of a basis row. Assigned once at construction and never reused.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(usize);

impl RowId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// One of the problem's original variables
    Decision,
    /// Auxiliary variable turning a "<=" constraint into an equality
    Slack,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub id: VarId,
    pub name: String,
    pub kind: VariableKind,
}

/// A constraint row together with the variable currently basic in it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasisRow {
    pub id: RowId,
    pub basic: VarId,
}

/// Dense Simplex tableau.
///
/// Coefficients are stored row-major, one row per constraint and one column
/// per variable (decision variables first, then one slack per constraint).
/// Every write goes through a setter which rounds to [`PRECISION`] digits.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TableauParts"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    variables: Vec<Variable>,
    rows: Vec<BasisRow>,
    cells: Vec<Decimal>,
    rhs: Vec<Decimal>,
    objective: Vec<Decimal>,
    objective_value: Decimal,
}

/// Unchecked wire form of a [`Tableau`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TableauParts {
    variables: Vec<Variable>,
    rows: Vec<BasisRow>,
    cells: Vec<Decimal>,
    rhs: Vec<Decimal>,
    objective: Vec<Decimal>,
    objective_value: Decimal,
}

#[cfg(feature = "serde")]
impl TryFrom<TableauParts> for Tableau {
    type Error = TableauError;

    fn try_from(parts: TableauParts) -> Result<Self, Self::Error> {
        let n_rows = parts.rows.len();
        let n_cols = parts.variables.len();

        if n_rows == 0 {
            return Err(TableauError::NoConstraints);
        }
        if n_cols <= n_rows {
            return Err(TableauError::NoVariables);
        }
        for (j, v) in parts.variables.iter().enumerate() {
            if v.id != VarId(j) {
                return Err(TableauError::UnknownColumn(v.id.0));
            }
        }
        for (i, r) in parts.rows.iter().enumerate() {
            if r.id != RowId(i) {
                return Err(TableauError::UnknownRow(r.id.0));
            }
            if r.basic.0 >= n_cols {
                return Err(TableauError::UnknownColumn(r.basic.0));
            }
        }

        let shapes = [
            ("cells", parts.cells.len(), n_rows * n_cols),
            ("rhs", parts.rhs.len(), n_rows),
            ("objective", parts.objective.len(), n_cols),
        ];
        for (part, found, expected) in shapes {
            if found != expected {
                return Err(TableauError::ShapeMismatch { part, found, expected });
            }
        }

        let rounded =
            |values: Vec<Decimal>| -> Vec<Decimal> { values.into_iter().map(round).collect() };
        Ok(Tableau {
            variables: parts.variables,
            rows: parts.rows,
            cells: rounded(parts.cells),
            rhs: rounded(parts.rhs),
            objective: rounded(parts.objective),
            objective_value: round(parts.objective_value),
        })
    }
}

impl Tableau {
    /// Builds the starting tableau of a problem: the slack variables form the
    /// initial basis and the objective row holds the negated objective.
    pub fn new(problem: &Problem) -> Result<Self, TableauError> {
        let n_vars = problem.num_variables();
        let n_constraints = problem.num_constraints();

        if n_vars == 0 {
            return Err(TableauError::NoVariables);
        }
        if n_constraints == 0 {
            return Err(TableauError::NoConstraints);
        }

        let n_cols = n_vars + n_constraints;

        let variables = (0..n_cols)
            .map(|j| Variable {
                id: VarId(j),
                name: format!("x{}", j + 1),
                kind: if j < n_vars {
                    VariableKind::Decision
                } else {
                    VariableKind::Slack
                },
            })
            .collect();

        let rows = (0..n_constraints)
            .map(|i| BasisRow {
                id: RowId(i),
                basic: VarId(n_vars + i),
            })
            .collect();

        let mut tableau = Tableau {
            variables,
            rows,
            cells: vec![Decimal::ZERO; n_constraints * n_cols],
            rhs: vec![Decimal::ZERO; n_constraints],
            objective: vec![Decimal::ZERO; n_cols],
            objective_value: Decimal::ZERO,
        };

        for (i, c) in problem.constraints.iter().enumerate() {
            let found = c.coefficients.len();
            if found != n_vars && found != n_cols {
                return Err(TableauError::DimensionMismatch {
                    row: i,
                    found,
                    decision: n_vars,
                    full: n_cols,
                });
            }
            if c.rhs < Decimal::ZERO {
                return Err(TableauError::NegativeRhs {
                    row: i,
                    rhs: c.rhs.to_string(),
                });
            }

            let row = RowId(i);
            // Only the decision part is read; the slack block is always the identity.
            for (j, &coef) in c.coefficients.iter().take(n_vars).enumerate() {
                tableau.set_cell(row, VarId(j), coef)?;
            }
            tableau.set_cell(row, VarId(n_vars + i), Decimal::ONE)?;
            tableau.set_rhs(row, c.rhs)?;
        }

        for (j, &coef) in problem.objective.iter().enumerate() {
            tableau.set_objective(VarId(j), -coef)?;
        }

        Ok(tableau)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.variables.len()
    }

    /// Number of original decision variables.
    pub fn num_decision(&self) -> usize {
        self.variables.len().saturating_sub(self.rows.len())
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn rows(&self) -> &[BasisRow] {
        &self.rows
    }

    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + use<> {
        (0..self.rows.len()).map(RowId)
    }

    pub fn column_ids(&self) -> impl Iterator<Item = VarId> + use<> {
        (0..self.variables.len()).map(VarId)
    }

    pub fn variable(&self, col: VarId) -> Result<&Variable, TableauError> {
        self.variables
            .get(col.0)
            .ok_or(TableauError::UnknownColumn(col.0))
    }

    /// The variable currently basic in `row`.
    pub fn basic_variable(&self, row: RowId) -> Result<VarId, TableauError> {
        self.rows
            .get(row.0)
            .map(|r| r.basic)
            .ok_or(TableauError::UnknownRow(row.0))
    }

    /// Display name of a basis row, which is always its basic variable's name.
    pub fn row_name(&self, row: RowId) -> Result<&str, TableauError> {
        let basic = self.basic_variable(row)?;
        Ok(self.variable(basic)?.name.as_str())
    }

    pub fn is_basic(&self, col: VarId) -> bool {
        self.rows.iter().any(|r| r.basic == col)
    }

    pub fn cell(&self, row: RowId, col: VarId) -> Result<Decimal, TableauError> {
        let idx = self.cell_index(row, col)?;
        Ok(self.cells[idx])
    }

    pub fn set_cell(&mut self, row: RowId, col: VarId, value: Decimal) -> Result<(), TableauError> {
        let idx = self.cell_index(row, col)?;
        self.cells[idx] = round(value);
        Ok(())
    }

    /// All coefficients of one constraint row, in column order.
    pub fn row_coefficients(&self, row: RowId) -> Result<&[Decimal], TableauError> {
        self.check_row(row)?;
        let n_cols = self.num_columns();
        Ok(&self.cells[row.0 * n_cols..(row.0 + 1) * n_cols])
    }

    pub fn rhs(&self, row: RowId) -> Result<Decimal, TableauError> {
        self.rhs
            .get(row.0)
            .copied()
            .ok_or(TableauError::UnknownRow(row.0))
    }

    pub fn set_rhs(&mut self, row: RowId, value: Decimal) -> Result<(), TableauError> {
        let slot = self
            .rhs
            .get_mut(row.0)
            .ok_or(TableauError::UnknownRow(row.0))?;
        *slot = round(value);
        Ok(())
    }

    pub fn rhs_column(&self) -> &[Decimal] {
        &self.rhs
    }

    /// Reduced cost of a column (its entry in the Z row).
    pub fn objective(&self, col: VarId) -> Result<Decimal, TableauError> {
        self.objective
            .get(col.0)
            .copied()
            .ok_or(TableauError::UnknownColumn(col.0))
    }

    pub fn set_objective(&mut self, col: VarId, value: Decimal) -> Result<(), TableauError> {
        let slot = self
            .objective
            .get_mut(col.0)
            .ok_or(TableauError::UnknownColumn(col.0))?;
        *slot = round(value);
        Ok(())
    }

    pub fn objective_row(&self) -> &[Decimal] {
        &self.objective
    }

    pub fn objective_value(&self) -> Decimal {
        self.objective_value
    }

    pub fn set_objective_value(&mut self, value: Decimal) {
        self.objective_value = round(value);
    }

    /// Makes `variable` the basic variable of `row`. Coefficients are left untouched.
    pub fn reassign_basis(&mut self, row: RowId, variable: VarId) -> Result<(), TableauError> {
        self.check_column(variable)?;
        let slot = self
            .rows
            .get_mut(row.0)
            .ok_or(TableauError::UnknownRow(row.0))?;
        slot.basic = variable;
        Ok(())
    }

    /// True when no reduced cost is negative.
    pub fn is_optimal(&self) -> bool {
        self.objective.iter().all(|v| *v >= Decimal::ZERO)
    }

    fn cell_index(&self, row: RowId, col: VarId) -> Result<usize, TableauError> {
        self.check_row(row)?;
        self.check_column(col)?;
        Ok(row.0 * self.num_columns() + col.0)
    }

    fn check_row(&self, row: RowId) -> Result<(), TableauError> {
        if row.0 < self.rows.len() {
            Ok(())
        } else {
            Err(TableauError::UnknownRow(row.0))
        }
    }

    fn check_column(&self, col: VarId) -> Result<(), TableauError> {
        if col.0 < self.variables.len() {
            Ok(())
        } else {
            Err(TableauError::UnknownColumn(col.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn textbook() -> Problem {
        Problem::new(vec![dec!(3), dec!(5)])
            .with_constraint(vec![dec!(1), dec!(0)], dec!(4))
            .with_constraint(vec![dec!(0), dec!(2)], dec!(12))
            .with_constraint(vec![dec!(3), dec!(2)], dec!(18))
    }

    #[test]
    fn test_construction_layout() {
        let t = Tableau::new(&textbook()).unwrap();

        assert_eq!(t.num_rows(), 3);
        assert_eq!(t.num_columns(), 5);
        assert_eq!(t.num_decision(), 2);

        let names: Vec<_> = t.variables().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["x1", "x2", "x3", "x4", "x5"]);
        assert_eq!(t.variables()[1].kind, VariableKind::Decision);
        assert_eq!(t.variables()[2].kind, VariableKind::Slack);
        assert_eq!(VarId::new(4).ordinal(), 5);

        let rows: Vec<_> = t.row_ids().map(|r| t.row_name(r).unwrap().to_string()).collect();
        assert_eq!(rows, vec!["x3", "x4", "x5"]);

        assert_eq!(t.row_coefficients(RowId::new(2)).unwrap(), &[dec!(3), dec!(2), dec!(0), dec!(0), dec!(1)]);
        assert_eq!(t.rhs_column(), &[dec!(4), dec!(12), dec!(18)]);
        assert_eq!(t.objective_row(), &[dec!(-3), dec!(-5), dec!(0), dec!(0), dec!(0)]);
        assert_eq!(t.objective_value(), dec!(0));
        assert!(!t.is_optimal());
    }

    #[test]
    fn test_slack_identity_holds_at_start() {
        let t = Tableau::new(&textbook()).unwrap();
        for row in t.row_ids() {
            let basic = t.basic_variable(row).unwrap();
            for other in t.row_ids() {
                let expected = if other == row { dec!(1) } else { dec!(0) };
                assert_eq!(t.cell(other, basic).unwrap(), expected);
            }
            assert_eq!(t.objective(basic).unwrap(), dec!(0));
        }
    }

    #[test]
    fn test_full_width_rows_ignore_given_slack_block() {
        let problem = Problem::new(vec![dec!(1)])
            .with_constraint(vec![dec!(2), dec!(7), dec!(9)], dec!(4))
            .with_constraint(vec![dec!(1), dec!(9), dec!(7)], dec!(3));
        let t = Tableau::new(&problem).unwrap();
        assert_eq!(t.row_coefficients(RowId::new(0)).unwrap(), &[dec!(2), dec!(1), dec!(0)]);
        assert_eq!(t.row_coefficients(RowId::new(1)).unwrap(), &[dec!(1), dec!(0), dec!(1)]);
    }

    #[test]
    fn test_rejects_inconsistent_rows() {
        let problem = Problem::new(vec![dec!(1), dec!(1)])
            .with_constraint(vec![dec!(1), dec!(1)], dec!(4))
            .with_constraint(vec![dec!(1), dec!(1), dec!(1)], dec!(4));
        assert_eq!(
            Tableau::new(&problem),
            Err(TableauError::DimensionMismatch { row: 1, found: 3, decision: 2, full: 4 })
        );
    }

    #[test]
    fn test_rejects_empty_and_negative_input() {
        assert_eq!(Tableau::new(&Problem::new(vec![])), Err(TableauError::NoVariables));
        assert_eq!(Tableau::new(&Problem::new(vec![dec!(1)])), Err(TableauError::NoConstraints));

        let problem = Problem::new(vec![dec!(1)]).with_constraint(vec![dec!(1)], dec!(-2));
        assert!(matches!(Tableau::new(&problem), Err(TableauError::NegativeRhs { row: 0, .. })));
    }

    #[test]
    fn test_unknown_lookups_fail() {
        let mut t = Tableau::new(&textbook()).unwrap();
        assert_eq!(t.cell(RowId::new(3), VarId::new(0)), Err(TableauError::UnknownRow(3)));
        assert_eq!(t.cell(RowId::new(0), VarId::new(5)), Err(TableauError::UnknownColumn(5)));
        assert_eq!(t.rhs(RowId::new(9)), Err(TableauError::UnknownRow(9)));
        assert_eq!(t.objective(VarId::new(9)), Err(TableauError::UnknownColumn(9)));
        assert_eq!(t.reassign_basis(RowId::new(0), VarId::new(7)), Err(TableauError::UnknownColumn(7)));
        assert_eq!(t.set_rhs(RowId::new(3), dec!(1)), Err(TableauError::UnknownRow(3)));
    }

    #[test]
    fn test_writes_are_rounded() {
        let mut t = Tableau::new(&textbook()).unwrap();
        let (row, col) = (RowId::new(0), VarId::new(0));

        t.set_cell(row, col, dec!(0.3333333)).unwrap();
        assert_eq!(t.cell(row, col).unwrap(), dec!(0.33));

        // Midpoints round to even
        t.set_rhs(row, dec!(2.345)).unwrap();
        assert_eq!(t.rhs(row).unwrap(), dec!(2.34));
        t.set_objective(col, dec!(-1.675)).unwrap();
        assert_eq!(t.objective(col).unwrap(), dec!(-1.68));

        t.set_objective_value(dec!(35.999));
        assert_eq!(t.objective_value(), dec!(36.00));
    }

    #[test]
    fn test_rounding_is_idempotent() {
        let mut t = Tableau::new(&textbook()).unwrap();
        let (row, col) = (RowId::new(1), VarId::new(1));

        t.set_cell(row, col, dec!(1.2345)).unwrap();
        let first = t.cell(row, col).unwrap();
        t.set_cell(row, col, first).unwrap();
        assert_eq!(t.cell(row, col).unwrap(), first);

        t.set_cell(row, col, dec!(4.25)).unwrap();
        t.set_cell(row, col, dec!(4.25)).unwrap();
        assert_eq!(t.cell(row, col).unwrap(), dec!(4.25));
    }

    #[test]
    fn test_zero_is_never_negative() {
        assert!(!round(dec!(-0.001)).is_sign_negative());
        assert_eq!(round(dec!(-0.004)).to_string(), "0");

        let problem = Problem::new(vec![dec!(0), dec!(5)]).with_constraint(vec![dec!(1), dec!(1)], dec!(4));
        let mut t = Tableau::new(&problem).unwrap();
        let zero = t.objective(VarId::new(0)).unwrap();
        assert!(!zero.is_sign_negative());
        assert_eq!(format!("{:.2}", zero), "0.00");

        t.set_cell(RowId::new(0), VarId::new(0), dec!(-0.003)).unwrap();
        assert_eq!(format!("{:.2}", t.cell(RowId::new(0), VarId::new(0)).unwrap()), "0.00");
        t.set_objective_value(dec!(-0.0));
        assert_eq!(t.objective_value().to_string(), "0");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_checks_layout() {
        let t = Tableau::new(&textbook()).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(serde_json::from_str::<Tableau>(&json).unwrap(), t);

        let x = |id: usize, kind: &str| format!(r#"{{"id":{id},"name":"x{}","kind":"{kind}"}}"#, id + 1);
        let variables = format!("[{},{}]", x(0, "Decision"), x(1, "Slack"));

        let basic_out_of_range = format!(
            r#"{{"variables":{variables},"rows":[{{"id":0,"basic":5}}],"cells":["1","1"],"rhs":["4"],"objective":["-1","0"],"objective_value":"0"}}"#
        );
        let err = serde_json::from_str::<Tableau>(&basic_out_of_range).unwrap_err();
        assert!(err.to_string().contains("Unknown variable column: 5"), "{}", err);

        let short_cells = format!(
            r#"{{"variables":{variables},"rows":[{{"id":0,"basic":1}}],"cells":[],"rhs":["4"],"objective":["-1","0"],"objective_value":"0"}}"#
        );
        let err = serde_json::from_str::<Tableau>(&short_cells).unwrap_err();
        assert!(err.to_string().contains("cells has 0 entries, expected 2"), "{}", err);

        let only_slack = r#"{"variables":[{"id":0,"name":"x1","kind":"Decision"}],"rows":[{"id":0,"basic":5}],"cells":[],"rhs":[],"objective":[],"objective_value":"0"}"#;
        assert!(serde_json::from_str::<Tableau>(only_slack).is_err());
    }

    #[test]
    fn test_reassign_basis_renames_row_only() {
        let mut t = Tableau::new(&textbook()).unwrap();
        let before = t.row_coefficients(RowId::new(1)).unwrap().to_vec();

        t.reassign_basis(RowId::new(1), VarId::new(1)).unwrap();

        assert_eq!(t.row_name(RowId::new(1)).unwrap(), "x2");
        assert!(t.is_basic(VarId::new(1)));
        assert!(!t.is_basic(VarId::new(3)));
        assert_eq!(t.row_coefficients(RowId::new(1)).unwrap(), before.as_slice());
    }
}
