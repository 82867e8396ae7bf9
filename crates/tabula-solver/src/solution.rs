use rust_decimal::Decimal;

use crate::tableau::Tableau;

/// Variable values read off a tableau
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Non-basic variables in column order, all implicitly 0
    pub non_basic: Vec<String>,
    /// Basic variables in row order with their row's right-hand side
    pub basic: Vec<BasicValue>,
    /// Current objective value
    pub objective_value: Decimal,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BasicValue {
    pub variable: String,
    pub value: Decimal,
}

impl Summary {
    pub fn from_tableau(tableau: &Tableau) -> Self {
        let non_basic = tableau
            .variables()
            .iter()
            .filter(|v| !tableau.is_basic(v.id))
            .map(|v| v.name.clone())
            .collect();

        let basic = tableau
            .rows()
            .iter()
            .zip(tableau.rhs_column())
            .filter_map(|(row, &value)| {
                let variable = tableau.variable(row.basic).ok()?;
                Some(BasicValue {
                    variable: variable.name.clone(),
                    value,
                })
            })
            .collect();

        Self {
            non_basic,
            basic,
            objective_value: tableau.objective_value(),
        }
    }

    /// Value of a named variable; non-basic variables are 0.
    pub fn value_of(&self, name: &str) -> Option<Decimal> {
        if let Some(b) = self.basic.iter().find(|b| b.variable == name) {
            return Some(b.value);
        }
        self.non_basic
            .iter()
            .any(|n| n == name)
            .then_some(Decimal::ZERO)
    }
}

impl Tableau {
    pub fn summary(&self) -> Summary {
        Summary::from_tableau(self)
    }
}
