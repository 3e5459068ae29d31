use serde::{Deserialize, Serialize};

use crate::error::OracleError;

pub const DEFAULT_NUMBER_OF_PICTURES: usize = 5;
pub const DEFAULT_MAXIMAL_REDRAW_ATTEMPTS: usize = 8;
pub const DEFAULT_TOLERANCE: f64 = 1e-7;
pub const DEFAULT_SEED: u64 = 0x6765_6f67_656e;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSettings {
    /// Independent numeric realizations kept per configuration.
    pub number_of_pictures: usize,
    /// Redraws tried after pictures disagree, before the batch is reported inconsistent.
    pub maximal_redraw_attempts: usize,
    /// Relative tolerance for numeric equality of objects.
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            number_of_pictures: DEFAULT_NUMBER_OF_PICTURES,
            maximal_redraw_attempts: DEFAULT_MAXIMAL_REDRAW_ATTEMPTS,
            tolerance: DEFAULT_TOLERANCE,
            seed: DEFAULT_SEED,
        }
    }
}

impl OracleSettings {
    pub fn validate(&self) -> Result<(), OracleError> {
        if self.number_of_pictures < 2 {
            return Err(OracleError::InvalidSettings(format!(
                "number_of_pictures must be at least 2, got {}",
                self.number_of_pictures
            )));
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(OracleError::InvalidSettings(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
