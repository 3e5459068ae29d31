use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use analytic_geometry::ConstructionCatalog;
use core_types::{
    Arguments, Configuration, ConfigurationId, ConfigurationObject, Construction, LooseObjectLayout,
    ObjectId, ObjectType,
};
use identity_store::IdentityStore;

use crate::error::GeneratorError;
use crate::filter::SymmetryGenerationMode;

/// What one generation run starts from and how far it may go.
#[derive(Clone, Debug)]
pub struct GeneratorInput {
    pub initial_configuration: Arc<Configuration>,
    pub constructions: Vec<Arc<Construction>>,
    pub number_of_iterations: usize,
    /// Cap on constructed objects of each type. Missing types are unlimited.
    pub maximal_number_of_objects: BTreeMap<ObjectType, usize>,
    pub symmetry: SymmetryGenerationMode,
}

impl GeneratorInput {
    pub fn new(
        initial_configuration: Arc<Configuration>,
        constructions: Vec<Arc<Construction>>,
        number_of_iterations: usize,
    ) -> Self {
        Self {
            initial_configuration,
            constructions,
            number_of_iterations,
            maximal_number_of_objects: BTreeMap::new(),
            symmetry: SymmetryGenerationMode::Any,
        }
    }

    pub fn with_cap(mut self, object_type: ObjectType, maximum: usize) -> Self {
        self.maximal_number_of_objects.insert(object_type, maximum);
        self
    }

    pub fn with_symmetry(mut self, symmetry: SymmetryGenerationMode) -> Self {
        self.symmetry = symmetry;
        self
    }

    pub(crate) fn validate(&self, catalog: &ConstructionCatalog) -> Result<(), GeneratorError> {
        if self.constructions.is_empty() {
            return Err(GeneratorError::InvalidInput("no constructions to apply".to_string()));
        }
        if let Some(unsupported) = self
            .constructions
            .iter()
            .find(|construction| !catalog.supports(construction))
        {
            return Err(GeneratorError::InvalidInput(format!(
                "construction {} has no evaluator",
                unsupported.name()
            )));
        }
        let mut names = self
            .constructions
            .iter()
            .map(|construction| construction.name())
            .collect::<Vec<_>>();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(GeneratorError::InvalidInput(format!(
                "construction {} is listed twice",
                pair[0]
            )));
        }
        Ok(())
    }

    /// Largest number of objects a single construction step adds.
    pub(crate) fn max_outputs(&self) -> usize {
        self.constructions
            .iter()
            .map(|construction| construction.outputs().len())
            .max()
            .unwrap_or(1)
    }

    /// Whether `counts` plus the outputs of `construction` stay within the caps.
    pub(crate) fn within_caps(&self, counts: &BTreeMap<ObjectType, usize>, construction: &Construction) -> bool {
        let mut added: BTreeMap<ObjectType, usize> = BTreeMap::new();
        for output in construction.outputs() {
            *added.entry(*output).or_insert(0) += 1;
        }
        added.iter().all(|(object_type, extra)| {
            self.maximal_number_of_objects
                .get(object_type)
                .is_none_or(|maximum| counts.get(object_type).copied().unwrap_or(0) + extra <= *maximum)
        })
    }
}

/// Assembles an initial configuration from named objects.
///
/// Loose objects are named by their layout labels (`A`, `B`, … or `l` for a line).
/// Extra outputs of a multi-output construction are named `name_2`, `name_3`, ….
#[derive(Debug)]
pub struct InitialConfigurationBuilder {
    store: Arc<IdentityStore>,
    layout: LooseObjectLayout,
    loose: Vec<Arc<ConfigurationObject>>,
    constructed: Vec<Arc<ConfigurationObject>>,
    names: HashMap<String, ObjectId>,
}

impl InitialConfigurationBuilder {
    pub fn new(store: Arc<IdentityStore>, layout: LooseObjectLayout) -> Self {
        let loose = store.loose_objects(layout);
        let names = loose
            .iter()
            .enumerate()
            .map(|(index, object)| (layout.label(index), object.id()))
            .collect();
        Self {
            store,
            layout,
            loose,
            constructed: Vec::new(),
            names,
        }
    }

    pub fn object_id(&self, name: &str) -> Option<ObjectId> {
        self.names.get(name).copied()
    }

    pub fn add(
        &mut self,
        name: &str,
        construction: &Arc<Construction>,
        arguments: Arguments,
    ) -> Result<Vec<ObjectId>, GeneratorError> {
        if self.names.contains_key(name) {
            return Err(GeneratorError::InvalidInput(format!("object {name} is defined twice")));
        }
        let objects = self.store.construct(construction, &arguments)?;
        let mut ids = Vec::with_capacity(objects.len());
        for (index, object) in objects.into_iter().enumerate() {
            let object_name = match index {
                0 => name.to_string(),
                _ => format!("{name}_{}", index + 1),
            };
            self.names.insert(object_name, object.id());
            ids.push(object.id());
            self.constructed.push(object);
        }
        Ok(ids)
    }

    pub fn build(self, id: ConfigurationId) -> Result<Configuration, GeneratorError> {
        Ok(Configuration::new(id, self.layout, self.loose, self.constructed)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use analytic_geometry::ConstructionCatalog;
    use core_types::{
        Argument, Arguments, Configuration, ConfigurationId, Construction, LooseObjectLayout,
        ObjectType, PredefinedConstructionType,
    };
    use identity_store::IdentityStore;

    use super::{GeneratorInput, InitialConfigurationBuilder};
    use crate::error::GeneratorError;

    fn triangle() -> Arc<Configuration> {
        let store = Arc::new(IdentityStore::new());
        Arc::new(
            InitialConfigurationBuilder::new(store, LooseObjectLayout::Triangle)
                .build(ConfigurationId::from_u64(0))
                .expect("triangle"),
        )
    }

    #[test]
    fn builder_names_loose_and_extra_outputs() {
        let store = Arc::new(IdentityStore::new());
        let mut builder = InitialConfigurationBuilder::new(Arc::clone(&store), LooseObjectLayout::Triangle);
        let a = builder.object_id("A").expect("A");
        let b = builder.object_id("B").expect("B");
        let c = builder.object_id("C").expect("C");

        let line = builder
            .add(
                "bc",
                &Construction::predefined(PredefinedConstructionType::LineFromPoints),
                Arguments::new(vec![Argument::Set(vec![Argument::Object(b), Argument::Object(c)])]),
            )
            .expect("line");
        let drop = builder
            .add(
                "D",
                &Construction::predefined(PredefinedConstructionType::PerpendicularDrop),
                Arguments::new(vec![Argument::Object(a), Argument::Object(line[0])]),
            )
            .expect("drop");
        assert_eq!(drop.len(), 2);
        assert_eq!(builder.object_id("D_2"), Some(drop[1]));

        let configuration = builder.build(ConfigurationId::from_u64(0)).expect("configuration");
        assert_eq!(configuration.constructed_objects().len(), 3);
    }

    #[test]
    fn builder_rejects_reused_names() {
        let mut builder = InitialConfigurationBuilder::new(Arc::new(IdentityStore::new()), LooseObjectLayout::LineSegment);
        let a = builder.object_id("A").expect("A");
        let b = builder.object_id("B").expect("B");
        let err = builder
            .add(
                "A",
                &Construction::predefined(PredefinedConstructionType::Midpoint),
                Arguments::new(vec![Argument::Set(vec![Argument::Object(a), Argument::Object(b)])]),
            )
            .expect_err("A is taken");
        assert!(matches!(err, GeneratorError::InvalidInput(_)));
    }

    #[test]
    fn input_validation_catches_wiring_mistakes() {
        let catalog = ConstructionCatalog::with_predefined();
        let midpoint = Construction::predefined(PredefinedConstructionType::Midpoint);

        let empty = GeneratorInput::new(triangle(), Vec::new(), 1);
        assert!(matches!(empty.validate(&catalog), Err(GeneratorError::InvalidInput(_))));

        let twice = GeneratorInput::new(triangle(), vec![Arc::clone(&midpoint), Arc::clone(&midpoint)], 1);
        assert!(matches!(twice.validate(&catalog), Err(GeneratorError::InvalidInput(_))));

        let unsupported = GeneratorInput::new(triangle(), vec![Arc::clone(&midpoint)], 1);
        assert!(matches!(
            unsupported.validate(&ConstructionCatalog::empty()),
            Err(GeneratorError::InvalidInput(_))
        ));

        assert!(GeneratorInput::new(triangle(), vec![midpoint], 1).validate(&catalog).is_ok());
    }

    #[test]
    fn caps_count_every_output() {
        let drop = Construction::predefined(PredefinedConstructionType::PerpendicularDrop);
        let input = GeneratorInput::new(triangle(), vec![Arc::clone(&drop)], 1)
            .with_cap(ObjectType::Point, 1)
            .with_cap(ObjectType::Line, 0);
        let counts = [(ObjectType::Point, 0)].into_iter().collect();
        assert!(!input.within_caps(&counts, &drop));

        let relaxed = input.with_cap(ObjectType::Line, 1);
        assert!(relaxed.within_caps(&counts, &drop));
        let full = [(ObjectType::Point, 1)].into_iter().collect();
        assert!(!relaxed.within_caps(&full, &drop));
        assert_eq!(relaxed.max_outputs(), 2);
    }
}
