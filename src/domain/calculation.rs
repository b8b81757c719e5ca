//! Calculation history record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed arithmetic operation, kept in an append-only capped log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calculation {
    pub id: i32,
    pub first_operand: f64,
    /// Operator symbol as displayed (`+`, `-`, `×`, `÷`)
    pub operator: String,
    pub second_operand: f64,
    pub result: f64,
    pub timestamp: DateTime<Utc>,
}

impl std::fmt::Display for Calculation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            self.first_operand, self.operator, self.second_operand, self.result
        )
    }
}
