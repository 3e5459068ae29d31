mod combinator;
mod variations;

use std::collections::{BTreeMap, HashSet};

use core_types::{Arguments, Configuration, ObjectId, ObjectType, Signature};

pub use combinator::Combinator;
pub use variations::Variations;

/// Objects available for argument binding, grouped by type in configuration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectPool {
    by_type: BTreeMap<ObjectType, Vec<ObjectId>>,
}

impl ObjectPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self {
            by_type: configuration.objects_by_type(),
        }
    }

    pub fn insert(&mut self, object_type: ObjectType, id: ObjectId) {
        let ids = self.by_type.entry(object_type).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    pub fn objects(&self, object_type: ObjectType) -> &[ObjectId] {
        self.by_type.get(&object_type).map_or(&[], Vec::as_slice)
    }

    pub fn count(&self, object_type: ObjectType) -> usize {
        self.objects(object_type).len()
    }
}

impl FromIterator<(ObjectType, ObjectId)> for ObjectPool {
    fn from_iter<I: IntoIterator<Item = (ObjectType, ObjectId)>>(iter: I) -> Self {
        let mut pool = Self::new();
        for (object_type, id) in iter {
            pool.insert(object_type, id);
        }
        pool
    }
}

/// Streams every distinct argument tree of a signature over a pool.
/// Trees equal up to reordering inside set parameters are yielded once.
#[derive(Debug)]
pub struct ArgumentGenerator {
    signature: Signature,
    types: Vec<(ObjectType, Vec<ObjectId>)>,
    combinations: Combinator,
    seen: HashSet<String>,
}

impl ArgumentGenerator {
    pub fn new(pool: &ObjectPool, signature: &Signature) -> Self {
        let counts = signature.type_counts();
        let types = counts
            .keys()
            .map(|object_type| (*object_type, pool.objects(*object_type).to_vec()))
            .collect::<Vec<_>>();
        let streams = counts
            .iter()
            .map(|(object_type, needed)| Variations::new(pool.count(*object_type), *needed))
            .collect();
        Self {
            signature: signature.clone(),
            types,
            combinations: Combinator::new(streams),
            seen: HashSet::new(),
        }
    }
}

impl Iterator for ArgumentGenerator {
    type Item = Arguments;

    fn next(&mut self) -> Option<Self::Item> {
        for combination in self.combinations.by_ref() {
            let picks = self
                .types
                .iter()
                .zip(&combination)
                .map(|((object_type, ids), indices)| {
                    (*object_type, indices.iter().map(|i| ids[*i]).collect())
                })
                .collect::<BTreeMap<_, Vec<_>>>();
            let Some(arguments) = self.signature.assemble(&picks) else {
                continue;
            };
            let arguments = arguments.normalized();
            if self.seen.insert(arguments.key()) {
                return Some(arguments);
            }
        }
        None
    }
}

/// Convenience entry point: lazily generates the arguments of `signature` over `pool`.
/// Empty right away when some type has fewer objects than the signature needs.
pub fn generate_arguments(pool: &ObjectPool, signature: &Signature) -> ArgumentGenerator {
    ArgumentGenerator::new(pool, signature)
}
