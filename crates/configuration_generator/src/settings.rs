use consistency_oracle::OracleSettings;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub oracle: OracleSettings,
    /// Merge configurations that differ only by a symmetry of the layout.
    pub isomorph_rejection: bool,
    /// Evaluate the candidates of one configuration on the rayon pool.
    pub parallel: bool,
    /// Construction applications taken from the argument stream per batch.
    pub chunk_size: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            oracle: OracleSettings::default(),
            isomorph_rejection: true,
            parallel: true,
            chunk_size: 256,
        }
    }
}

impl GenerationSettings {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.chunk_size == 0 {
            return Err(GeneratorError::InvalidSettings("chunk_size must be at least 1".to_string()));
        }
        self.oracle
            .validate()
            .map_err(|err| GeneratorError::InvalidSettings(err.to_string()))
    }
}
