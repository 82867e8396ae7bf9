use rust_decimal::Decimal;

/// A standard-form linear program: maximize `objective · x` subject to
/// `coefficients · x <= rhs` for every constraint, with `x >= 0`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// Objective coefficients, one per decision variable
    pub objective: Vec<Decimal>,
    /// "<=" constraints
    pub constraints: Vec<Constraint>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Decision coefficients, optionally followed by the slack block
    pub coefficients: Vec<Decimal>,
    /// Right-hand side value
    pub rhs: Decimal,
}

impl Problem {
    pub fn new(objective: Vec<Decimal>) -> Self {
        Self {
            objective,
            constraints: Vec::new(),
        }
    }

    pub fn add_constraint(&mut self, coefficients: Vec<Decimal>, rhs: Decimal) {
        self.constraints.push(Constraint { coefficients, rhs });
    }

    pub fn with_constraint(mut self, coefficients: Vec<Decimal>, rhs: Decimal) -> Self {
        self.add_constraint(coefficients, rhs);
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}
