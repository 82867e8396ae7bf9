use rust_decimal::Decimal;
use tracing::{trace, warn};

use crate::error::TableauError;
use crate::tableau::{RowId, Tableau, VarId};

/// Rule used by the ratio test to decide which rows may leave the basis.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatioTest {
    /// Rows with a positive entering coefficient are eligible, including
    /// degenerate rows whose ratio is zero.
    #[default]
    Strict,
    /// A zero entering coefficient forces the ratio to zero, and every row
    /// with a zero ratio is dropped. Negative ratios stay eligible.
    Legacy,
}

/// Picks the column with the most negative reduced cost, first one on ties.
///
/// Returns `None` when no reduced cost is negative, i.e. the tableau is optimal.
pub fn select_entering_column(objective_row: &[Decimal]) -> Option<VarId> {
    let mut min_val = Decimal::ZERO;
    let mut min_col = None;

    for (j, &value) in objective_row.iter().enumerate() {
        if value < min_val {
            min_val = value;
            min_col = Some(VarId::new(j));
        }
    }

    min_col
}

/// Runs the ratio test on `entering` and returns the row with the smallest
/// ratio, first one on ties.
///
/// `Ok(None)` means no row is eligible: the objective is unbounded along the
/// entering column, or (under [`RatioTest::Legacy`]) every candidate was
/// filtered out.
pub fn select_leaving_row(
    tableau: &Tableau,
    entering: VarId,
    rule: RatioTest,
) -> Result<Option<RowId>, TableauError> {
    let mut best: Option<(Decimal, RowId)> = None;

    for row in tableau.row_ids() {
        let Some(ratio) = row_ratio(tableau, row, entering, rule)? else {
            continue;
        };
        trace!(
            component = "selector",
            operation = "ratio_test",
            row = row.index(),
            %ratio,
            "Candidate leaving row"
        );
        match best {
            Some((min_ratio, _)) if ratio >= min_ratio => {}
            _ => best = Some((ratio, row)),
        }
    }

    Ok(best.map(|(_, row)| row))
}

fn row_ratio(
    tableau: &Tableau,
    row: RowId,
    entering: VarId,
    rule: RatioTest,
) -> Result<Option<Decimal>, TableauError> {
    let coef = tableau.cell(row, entering)?;
    let rhs = tableau.rhs(row)?;
    let divide = || {
        rhs.checked_div(coef).ok_or(TableauError::Overflow {
            row: row.index(),
            column: entering.index(),
        })
    };

    match rule {
        RatioTest::Strict => {
            if coef <= Decimal::ZERO {
                return Ok(None);
            }
            divide().map(Some)
        }
        RatioTest::Legacy => {
            let ratio = if coef.is_zero() {
                Decimal::ZERO
            } else {
                divide()?
            };
            if !ratio.is_zero() {
                return Ok(Some(ratio));
            }
            if coef > Decimal::ZERO {
                warn!(
                    component = "selector",
                    operation = "ratio_test",
                    status = "warn",
                    row = row.index(),
                    "Degenerate row with zero ratio discarded"
                );
            }
            Ok(None)
        }
    }
}
