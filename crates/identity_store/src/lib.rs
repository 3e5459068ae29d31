use std::collections::HashMap;
use std::sync::Arc;

use core_types::{
    Arguments, ConfigurationError, ConfigurationObject, Construction, LooseObjectLayout, ObjectId,
    ObjectKind, ObjectType,
};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::trace;

/// Structural identity of an object. Two objects with the same key are the same object.
/// Constructed objects are keyed by [`Construction::identity_key`], not by display name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKey {
    Loose {
        index: usize,
        object_type: ObjectType,
    },
    Constructed {
        construction: String,
        arguments: String,
        output: usize,
    },
}

impl ObjectKey {
    pub fn of(object: &ConfigurationObject) -> Self {
        match object.kind() {
            ObjectKind::Loose { index } => Self::Loose {
                index: *index,
                object_type: object.object_type(),
            },
            ObjectKind::Constructed {
                construction,
                arguments,
                output,
            } => Self::Constructed {
                construction: construction.identity_key(),
                arguments: arguments.normalized().key(),
                output: *output,
            },
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("object {0} was never issued by this store")]
    UnknownObject(ObjectId),
    #[error(transparent)]
    SignatureMismatch(#[from] ConfigurationError),
}

#[derive(Default)]
struct Registry {
    ids: HashMap<ObjectKey, ObjectId>,
    objects: Vec<Arc<ConfigurationObject>>,
}

impl Registry {
    fn issue<F>(&mut self, key: ObjectKey, make: F) -> Result<Arc<ConfigurationObject>, IdentityError>
    where
        F: FnOnce(ObjectId) -> Result<ConfigurationObject, ConfigurationError>,
    {
        if let Some(id) = self.ids.get(&key) {
            return self
                .objects
                .get(id.as_u64() as usize)
                .cloned()
                .ok_or(IdentityError::UnknownObject(*id));
        }
        let id = ObjectId::from_u64(self.objects.len() as u64);
        let object = Arc::new(make(id)?);
        trace!(?id, ?key, "issued object identity");
        self.ids.insert(key, id);
        self.objects.push(Arc::clone(&object));
        Ok(object)
    }
}

/// Hands out one [`ObjectId`] per structural key and keeps the objects they name.
/// Shared by every configuration of a generation run; safe to use from worker threads.
#[derive(Default)]
pub struct IdentityStore {
    registry: Mutex<Registry>,
}

impl std::fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityStore")
            .field("objects", &self.len())
            .finish()
    }
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loose objects of `layout`, in layout order.
    pub fn loose_objects(&self, layout: LooseObjectLayout) -> Vec<Arc<ConfigurationObject>> {
        let mut registry = self.registry.lock();
        layout
            .object_types()
            .into_iter()
            .enumerate()
            .filter_map(|(index, object_type)| {
                registry
                    .issue(ObjectKey::Loose { index, object_type }, |id| {
                        Ok(ConfigurationObject::loose(id, index, object_type))
                    })
                    .ok()
            })
            .collect()
    }

    /// Objects produced by applying `construction` to `arguments`, one per output.
    /// Arguments are normalized first, so set order never changes the result.
    /// All outputs of one application are issued under a single lock.
    pub fn construct(
        &self,
        construction: &Arc<Construction>,
        arguments: &Arguments,
    ) -> Result<Vec<Arc<ConfigurationObject>>, IdentityError> {
        let arguments = arguments.normalized();
        let mut registry = self.registry.lock();

        construction
            .signature()
            .validate(construction.name(), &arguments, |id| {
                registry
                    .objects
                    .get(id.as_u64() as usize)
                    .map(|object| object.object_type())
            })
            .map_err(|err| match err {
                ConfigurationError::UnknownObject(id) => IdentityError::UnknownObject(id),
                other => IdentityError::SignatureMismatch(other),
            })?;

        let key = arguments.key();
        let construction_key = construction.identity_key();
        (0..construction.outputs().len())
            .map(|output| {
                let object_key = ObjectKey::Constructed {
                    construction: construction_key.clone(),
                    arguments: key.clone(),
                    output,
                };
                registry.issue(object_key, |id| {
                    ConfigurationObject::constructed(
                        id,
                        Arc::clone(construction),
                        arguments.clone(),
                        output,
                    )
                })
            })
            .collect()
    }

    pub fn resolve(&self, key: &ObjectKey) -> Option<ObjectId> {
        self.registry.lock().ids.get(key).copied()
    }

    pub fn object(&self, id: ObjectId) -> Option<Arc<ConfigurationObject>> {
        self.registry.lock().objects.get(id.as_u64() as usize).cloned()
    }

    pub fn object_type(&self, id: ObjectId) -> Option<ObjectType> {
        self.object(id).map(|object| object.object_type())
    }

    pub fn len(&self) -> usize {
        self.registry.lock().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
