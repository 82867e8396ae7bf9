use rust_decimal::Decimal;

use crate::error::TableauError;
use crate::tableau::{RowId, Tableau, VarId};

/// Gauss-Jordan pivot on (`leaving`, `entering`).
///
/// The leaving row is scaled so the pivot cell becomes 1, then the entering
/// column is eliminated from every other constraint row, the objective row
/// and the objective value. Elimination factors are read before any row is
/// touched. Finally `entering` becomes the basic variable of `leaving`.
///
/// The tableau is only modified when the whole pivot succeeds.
pub fn pivot(tableau: &mut Tableau, leaving: RowId, entering: VarId) -> Result<(), TableauError> {
    let pivot_element = tableau.cell(leaving, entering)?;
    if pivot_element.is_zero() {
        return Err(TableauError::ZeroPivot {
            row: leaving.index(),
            column: entering.index(),
        });
    }
    let scale = Decimal::ONE
        .checked_div(pivot_element)
        .ok_or_else(|| overflow(leaving.index(), entering.index()))?;

    let mut next = tableau.clone();
    let rhs_column = next.num_columns();
    let objective_row = next.num_rows();

    let factors = next
        .row_ids()
        .map(|row| next.cell(row, entering))
        .collect::<Result<Vec<_>, _>>()?;
    let objective_factor = next.objective(entering)?;

    // Normalize the leaving row
    for col in next.column_ids() {
        let value = next.cell(leaving, col)?;
        let scaled = value
            .checked_mul(scale)
            .ok_or_else(|| overflow(leaving.index(), col.index()))?;
        next.set_cell(leaving, col, scaled)?;
    }
    let rhs = next.rhs(leaving)?;
    let scaled = rhs
        .checked_mul(scale)
        .ok_or_else(|| overflow(leaving.index(), rhs_column))?;
    next.set_rhs(leaving, scaled)?;

    let pivot_row = next.row_coefficients(leaving)?.to_vec();
    let pivot_rhs = next.rhs(leaving)?;

    // Eliminate the entering column from the other constraint rows
    for (row, &factor) in next.row_ids().zip(&factors) {
        if row == leaving || factor.is_zero() {
            continue;
        }
        for (col, &p) in next.column_ids().zip(&pivot_row) {
            let value = next.cell(row, col)?;
            next.set_cell(row, col, mul_sub(value, factor, p, row.index(), col.index())?)?;
        }
        let rhs = next.rhs(row)?;
        next.set_rhs(row, mul_sub(rhs, factor, pivot_rhs, row.index(), rhs_column)?)?;
    }

    // ... and from the objective row
    if !objective_factor.is_zero() {
        for (col, &p) in next.column_ids().zip(&pivot_row) {
            let value = next.objective(col)?;
            let updated = mul_sub(value, objective_factor, p, objective_row, col.index())?;
            next.set_objective(col, updated)?;
        }
        let value = next.objective_value();
        let updated = mul_sub(value, objective_factor, pivot_rhs, objective_row, rhs_column)?;
        next.set_objective_value(updated);
    }

    next.reassign_basis(leaving, entering)?;
    *tableau = next;
    Ok(())
}

/// `value - factor * p`, failing instead of panicking when the result does not fit.
fn mul_sub(
    value: Decimal,
    factor: Decimal,
    p: Decimal,
    row: usize,
    column: usize,
) -> Result<Decimal, TableauError> {
    factor
        .checked_mul(p)
        .and_then(|product| value.checked_sub(product))
        .ok_or_else(|| overflow(row, column))
}

fn overflow(row: usize, column: usize) -> TableauError {
    TableauError::Overflow { row, column }
}
