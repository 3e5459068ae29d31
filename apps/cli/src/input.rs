use std::collections::BTreeMap;
use std::sync::Arc;

use configuration_generator::{
    GeneratorError, GeneratorInput, InitialConfigurationBuilder, SymmetryGenerationMode,
};
use core_types::{Argument, Arguments, ConfigurationId, LooseObjectLayout, ObjectType, construction_by_name};
use identity_store::IdentityStore;
use serde::Deserialize;
use thiserror::Error;

/// Problem description read from `--input`.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProblemFile {
    pub layout: LooseObjectLayout,
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    pub constructions: Vec<String>,
    pub iterations: usize,
    #[serde(default)]
    pub maximal_objects: BTreeMap<ObjectType, usize>,
    #[serde(default)]
    pub symmetry: SymmetryGenerationMode,
}

/// A named constructed object of the initial configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectSpec {
    pub name: String,
    pub construction: String,
    pub arguments: Vec<ArgumentSpec>,
}

/// An object name, or a nested array for an unordered set.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ArgumentSpec {
    Name(String),
    Set(Vec<ArgumentSpec>),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("unknown construction {0}")]
    UnknownConstruction(String),
    #[error("object {object} refers to unknown object {argument}")]
    UnknownName { object: String, argument: String },
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

impl ArgumentSpec {
    fn resolve(&self, object: &str, builder: &InitialConfigurationBuilder) -> Result<Argument, InputError> {
        match self {
            Self::Name(name) => builder
                .object_id(name)
                .map(Argument::Object)
                .ok_or_else(|| InputError::UnknownName {
                    object: object.to_string(),
                    argument: name.clone(),
                }),
            Self::Set(items) => items
                .iter()
                .map(|item| item.resolve(object, builder))
                .collect::<Result<Vec<_>, _>>()
                .map(Argument::Set),
        }
    }
}

impl ProblemFile {
    /// Builds the initial configuration in `store` and the generator input around it.
    pub fn into_input(self, store: Arc<IdentityStore>) -> Result<GeneratorInput, InputError> {
        let mut builder = InitialConfigurationBuilder::new(store, self.layout);
        for spec in &self.objects {
            let construction = construction_by_name(&spec.construction)
                .ok_or_else(|| InputError::UnknownConstruction(spec.construction.clone()))?;
            let arguments = spec
                .arguments
                .iter()
                .map(|argument| argument.resolve(&spec.name, &builder))
                .collect::<Result<Vec<_>, _>>()?;
            builder.add(&spec.name, &construction, Arguments::new(arguments))?;
        }
        let initial = Arc::new(builder.build(ConfigurationId::from_u64(0))?);

        let constructions = self
            .constructions
            .iter()
            .map(|name| construction_by_name(name).ok_or_else(|| InputError::UnknownConstruction(name.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        let mut input = GeneratorInput::new(initial, constructions, self.iterations).with_symmetry(self.symmetry);
        input.maximal_number_of_objects = self.maximal_objects;
        Ok(input)
    }
}
