use canonical_form::{CanonicalFormError, symmetry_defect};
use core_types::Configuration;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;

/// Decides which validated configurations are emitted and which are extended further.
/// An error ends the run.
pub trait ConfigurationFilter: Send + Sync {
    /// Whether `configuration` is handed to the consumer. Side-effect free.
    fn accept(&self, configuration: &Configuration) -> Result<bool, GeneratorError>;

    /// Whether configurations derived from `configuration` within
    /// `remaining_iterations` more steps can still be accepted.
    fn keep_extending(
        &self,
        _configuration: &Configuration,
        _remaining_iterations: usize,
    ) -> Result<bool, GeneratorError> {
        Ok(true)
    }
}

impl<F> ConfigurationFilter for F
where
    F: Fn(&Configuration) -> bool + Send + Sync,
{
    fn accept(&self, configuration: &Configuration) -> Result<bool, GeneratorError> {
        Ok(self(configuration))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymmetryGenerationMode {
    #[default]
    Any,
    /// Symmetric under every symmetry of the layout.
    SymmetricOnlyFully,
    /// Symmetric under at least one symmetry other than the identity.
    SymmetricOnlyPartially,
}

#[derive(Clone, Debug)]
pub struct SymmetryFilter {
    mode: SymmetryGenerationMode,
    max_outputs: usize,
}

impl SymmetryFilter {
    /// `max_outputs` is the largest number of objects one construction step adds.
    pub fn new(mode: SymmetryGenerationMode, max_outputs: usize) -> Self {
        Self { mode, max_outputs }
    }

    pub fn mode(&self) -> SymmetryGenerationMode {
        self.mode
    }

    fn defects(&self, configuration: &Configuration) -> Result<Vec<usize>, CanonicalFormError> {
        configuration
            .layout()
            .symmetry_permutations()
            .iter()
            .filter(|permutation| !permutation.is_identity())
            .map(|permutation| symmetry_defect(configuration, permutation))
            .collect()
    }
}

impl ConfigurationFilter for SymmetryFilter {
    fn accept(&self, configuration: &Configuration) -> Result<bool, GeneratorError> {
        Ok(match self.mode {
            SymmetryGenerationMode::Any => true,
            SymmetryGenerationMode::SymmetricOnlyFully => {
                self.defects(configuration)?.iter().all(|defect| *defect == 0)
            }
            SymmetryGenerationMode::SymmetricOnlyPartially => {
                self.defects(configuration)?.contains(&0)
            }
        })
    }

    fn keep_extending(
        &self,
        configuration: &Configuration,
        remaining_iterations: usize,
    ) -> Result<bool, GeneratorError> {
        let reachable = remaining_iterations.saturating_mul(self.max_outputs);
        Ok(match self.mode {
            SymmetryGenerationMode::Any => true,
            SymmetryGenerationMode::SymmetricOnlyFully => {
                self.defects(configuration)?.iter().all(|defect| *defect <= reachable)
            }
            SymmetryGenerationMode::SymmetricOnlyPartially => {
                self.defects(configuration)?.iter().any(|defect| *defect <= reachable)
            }
        })
    }
}
