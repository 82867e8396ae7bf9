use std::fmt::Write;

use rust_decimal::Decimal;
use tabula_solver::{Pivot, Summary, Tableau};

const WIDTH: usize = 8;

fn cell(value: Decimal) -> String {
    format!("{:>WIDTH$.2}", value)
}

/// Renders a tableau as a `Base | variables.. | b` grid with a trailing Z row.
pub fn tableau(t: &Tableau) -> String {
    let mut out = String::new();

    let _ = write!(out, "{:<WIDTH$}", "Base");
    for v in t.variables() {
        let _ = write!(out, "{:>WIDTH$}", v.name);
    }
    let _ = writeln!(out, "{:>WIDTH$}", "b");

    for row in t.row_ids() {
        let name = t.row_name(row).unwrap_or("?");
        let _ = write!(out, "{:<WIDTH$}", name);
        for &value in t.row_coefficients(row).unwrap_or(&[]) {
            out.push_str(&cell(value));
        }
        let rhs = t.rhs(row).unwrap_or_default();
        let _ = writeln!(out, "{}", cell(rhs));
    }

    let _ = write!(out, "{:<WIDTH$}", "Z");
    for &value in t.objective_row() {
        out.push_str(&cell(value));
    }
    let _ = writeln!(out, "{}", cell(t.objective_value()));

    out
}

pub fn pivot(p: &Pivot) -> String {
    format!(
        "Iteration {}: {} enters, {} leaves (pivot {:.2})",
        p.iteration, p.entering_name, p.leaving_name, p.pivot_element
    )
}

pub fn summary(s: &Summary) -> String {
    let mut out = String::new();
    if s.non_basic.is_empty() {
        let _ = writeln!(out, "Non-basic variables: none");
    } else {
        let _ = writeln!(out, "Non-basic variables: {} = 0", s.non_basic.join(" = "));
    }
    let _ = writeln!(out, "Basic variables:");
    for b in &s.basic {
        let _ = writeln!(out, "  {} = {:.2}", b.variable, b.value);
    }
    let _ = writeln!(out, "Objective: Z = {:.2}", s.objective_value);
    out
}
