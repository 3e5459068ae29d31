use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigurationError;
use crate::layout::LooseObjectLayout;
use crate::object::{ConfigurationObject, ObjectId, ObjectType};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigurationId(u64);

impl ConfigurationId {
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ConfigurationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cfg#{}", self.0)
    }
}

/// Immutable loose objects plus constructed objects, each depending only on earlier ones.
/// Derived configurations keep a handle on the configuration they extend.
#[derive(Clone, Debug)]
pub struct Configuration {
    id: ConfigurationId,
    layout: LooseObjectLayout,
    loose_objects: Vec<Arc<ConfigurationObject>>,
    constructed_objects: Vec<Arc<ConfigurationObject>>,
    parent: Option<Arc<Configuration>>,
    iteration: usize,
    object_ids: HashSet<ObjectId>,
}

impl Configuration {
    pub fn new(
        id: ConfigurationId,
        layout: LooseObjectLayout,
        loose_objects: Vec<Arc<ConfigurationObject>>,
        constructed_objects: Vec<Arc<ConfigurationObject>>,
    ) -> Result<Self, ConfigurationError> {
        let expected = layout.object_types();
        let actual = loose_objects
            .iter()
            .map(|object| object.object_type())
            .collect::<Vec<_>>();
        let all_loose = loose_objects.iter().all(|object| object.is_loose());
        if expected != actual || !all_loose {
            return Err(ConfigurationError::LayoutMismatch {
                layout: layout.name().to_string(),
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
            });
        }

        let mut configuration = Self {
            id,
            layout,
            object_ids: loose_objects.iter().map(|object| object.id()).collect(),
            loose_objects,
            constructed_objects: Vec::new(),
            parent: None,
            iteration: 0,
        };
        configuration.append(constructed_objects)?;
        Ok(configuration)
    }

    /// Extends `parent` by the objects of one construction application.
    pub fn derive(
        parent: &Arc<Configuration>,
        id: ConfigurationId,
        new_objects: Vec<Arc<ConfigurationObject>>,
    ) -> Result<Self, ConfigurationError> {
        let mut configuration = Self {
            id,
            layout: parent.layout,
            loose_objects: parent.loose_objects.clone(),
            constructed_objects: parent.constructed_objects.clone(),
            parent: Some(Arc::clone(parent)),
            iteration: parent.iteration + 1,
            object_ids: parent.object_ids.clone(),
        };
        configuration.append(new_objects)?;
        Ok(configuration)
    }

    fn append(&mut self, objects: Vec<Arc<ConfigurationObject>>) -> Result<(), ConfigurationError> {
        for object in objects {
            if object.is_loose() {
                return Err(ConfigurationError::LooseObjectAppended(object.id()));
            }
            if self.object_ids.contains(&object.id()) {
                return Err(ConfigurationError::DuplicateObject(object.id()));
            }
            if let Some(missing) = object
                .dependencies()
                .into_iter()
                .find(|dependency| !self.object_ids.contains(dependency))
            {
                return Err(ConfigurationError::UnknownArgument {
                    object: object.id(),
                    argument: missing,
                });
            }
            self.object_ids.insert(object.id());
            self.constructed_objects.push(object);
        }
        Ok(())
    }

    pub fn id(&self) -> ConfigurationId {
        self.id
    }

    pub fn layout(&self) -> LooseObjectLayout {
        self.layout
    }

    pub fn loose_objects(&self) -> &[Arc<ConfigurationObject>] {
        &self.loose_objects
    }

    pub fn constructed_objects(&self) -> &[Arc<ConfigurationObject>] {
        &self.constructed_objects
    }

    pub fn parent(&self) -> Option<&Arc<Configuration>> {
        self.parent.as_ref()
    }

    /// Number of construction applications since the initial configuration.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Constructed objects added on top of the parent; all of them for a root.
    pub fn newest_objects(&self) -> &[Arc<ConfigurationObject>] {
        let inherited = self
            .parent
            .as_ref()
            .map_or(0, |parent| parent.constructed_objects.len());
        &self.constructed_objects[inherited..]
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.object_ids.contains(&id)
    }

    pub fn object_ids(&self) -> &HashSet<ObjectId> {
        &self.object_ids
    }

    pub fn objects(&self) -> impl Iterator<Item = &Arc<ConfigurationObject>> {
        self.loose_objects.iter().chain(self.constructed_objects.iter())
    }

    pub fn objects_by_type(&self) -> BTreeMap<ObjectType, Vec<ObjectId>> {
        let mut out: BTreeMap<ObjectType, Vec<ObjectId>> = BTreeMap::new();
        for object in self.objects() {
            out.entry(object.object_type()).or_default().push(object.id());
        }
        out
    }

    pub fn constructed_count_by_type(&self) -> BTreeMap<ObjectType, usize> {
        let mut out = BTreeMap::new();
        for object in &self.constructed_objects {
            *out.entry(object.object_type()).or_insert(0) += 1;
        }
        out
    }
}
