//! Shared fixtures for the cross-crate scenarios in `tests/integration`.

use std::sync::Arc;

use analytic_geometry::ConstructionCatalog;
use configuration_generator::{
    ConfigurationGenerator, GeneratedConfiguration, GenerationSettings, GenerationStatistics, GeneratorError,
    GeneratorInput, InitialConfigurationBuilder,
};
use core_types::{Configuration, ConfigurationId, Construction, LooseObjectLayout, PredefinedConstructionType};
use identity_store::IdentityStore;

pub struct Scenario {
    pub store: Arc<IdentityStore>,
    pub catalog: Arc<ConstructionCatalog>,
    pub settings: GenerationSettings,
}

impl Scenario {
    pub fn new(settings: GenerationSettings) -> Self {
        Self::with_catalog(settings, ConstructionCatalog::with_predefined())
    }

    pub fn with_catalog(settings: GenerationSettings, catalog: ConstructionCatalog) -> Self {
        Self {
            store: Arc::new(IdentityStore::new()),
            catalog: Arc::new(catalog),
            settings,
        }
    }

    pub fn builder(&self, layout: LooseObjectLayout) -> InitialConfigurationBuilder {
        InitialConfigurationBuilder::new(Arc::clone(&self.store), layout)
    }

    /// The layout's loose objects and nothing else.
    pub fn bare(&self, layout: LooseObjectLayout) -> Result<Arc<Configuration>, GeneratorError> {
        Ok(Arc::new(self.builder(layout).build(ConfigurationId::from_u64(0))?))
    }

    pub fn input(
        &self,
        initial: Arc<Configuration>,
        constructions: &[PredefinedConstructionType],
        iterations: usize,
    ) -> GeneratorInput {
        let constructions = constructions
            .iter()
            .map(|kind| Construction::predefined(*kind))
            .collect();
        GeneratorInput::new(initial, constructions, iterations)
    }

    pub fn generator(&self) -> ConfigurationGenerator {
        ConfigurationGenerator::new(Arc::clone(&self.store), Arc::clone(&self.catalog), self.settings.clone())
    }

    /// Drains a whole run.
    pub fn run(
        &self,
        input: GeneratorInput,
    ) -> Result<(Vec<GeneratedConfiguration>, GenerationStatistics), GeneratorError> {
        let mut run = self.generator().generate(input)?;
        let mut generated = Vec::new();
        for item in run.by_ref() {
            generated.push(item?);
        }
        Ok((generated, run.statistics()))
    }
}

pub fn sequential() -> GenerationSettings {
    GenerationSettings {
        parallel: false,
        ..GenerationSettings::default()
    }
}
