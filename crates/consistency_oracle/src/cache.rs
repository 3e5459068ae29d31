use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use core_types::{ConfigurationObject, ObjectId};
use parking_lot::RwLock;

/// Remembers batches whose outcome does not depend on the configuration they
/// were tried in, so re-derivations skip the pictures.
#[derive(Debug, Default)]
pub struct OutcomeCache {
    unconstructible: RwLock<HashSet<Vec<ObjectId>>>,
    duplicates: RwLock<HashMap<ObjectId, ObjectId>>,
}

fn batch_key(batch: &[Arc<ConfigurationObject>]) -> Vec<ObjectId> {
    let mut ids = batch.iter().map(|object| object.id()).collect::<Vec<_>>();
    ids.sort();
    ids
}

impl OutcomeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unconstructible(&self, batch: &[Arc<ConfigurationObject>]) -> bool {
        self.unconstructible.read().contains(&batch_key(batch))
    }

    pub fn mark_unconstructible(&self, batch: &[Arc<ConfigurationObject>]) {
        self.unconstructible.write().insert(batch_key(batch));
    }

    pub fn record_duplicates(&self, pairs: &[(ObjectId, ObjectId)]) {
        let mut duplicates = self.duplicates.write();
        for (new, existing) in pairs {
            if new != existing {
                duplicates.insert(*new, *existing);
            }
        }
    }

    /// Known `(new, existing)` pairs of the batch, provided every existing target
    /// satisfies `present`.
    pub fn duplicates_of<F>(&self, batch: &[Arc<ConfigurationObject>], present: F) -> Option<Vec<(ObjectId, ObjectId)>>
    where
        F: Fn(ObjectId) -> bool,
    {
        let duplicates = self.duplicates.read();
        let pairs = batch
            .iter()
            .filter_map(|object| duplicates.get(&object.id()).map(|existing| (object.id(), *existing)))
            .collect::<Vec<_>>();
        (!pairs.is_empty() && pairs.iter().all(|(_, existing)| present(*existing))).then_some(pairs)
    }

    pub fn unconstructible_count(&self) -> usize {
        self.unconstructible.read().len()
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates.read().len()
    }
}
