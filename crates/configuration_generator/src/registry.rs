use std::collections::HashSet;

use canonical_form::CanonicalForm;

/// Canonical forms seen in the layer being built. Only digests are kept.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    seen: HashSet<[u8; 32]>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when `form` had not been seen in this layer yet.
    pub fn insert(&mut self, form: &CanonicalForm) -> bool {
        self.seen.insert(form.digest())
    }

    /// Frees a digest whose candidate could not be settled, so a later isomorph may claim it.
    pub fn release(&mut self, digest: &[u8; 32]) -> bool {
        self.seen.remove(digest)
    }

    pub fn contains(&self, form: &CanonicalForm) -> bool {
        self.seen.contains(&form.digest())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use canonical_form::canonical_form;
    use core_types::{Configuration, ConfigurationId, LooseObjectLayout};
    use identity_store::IdentityStore;

    use super::LayerRegistry;

    #[test]
    fn remembers_forms_by_digest() {
        let store = IdentityStore::new();
        let layout = LooseObjectLayout::Triangle;
        let triangle = Configuration::new(ConfigurationId::from_u64(0), layout, store.loose_objects(layout), Vec::new())
            .expect("triangle");
        let form = canonical_form(&triangle, &layout.symmetry_permutations()).expect("form");

        let mut registry = LayerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.insert(&form));
        assert!(!registry.insert(&form));
        assert!(registry.contains(&form));
        assert_eq!(registry.len(), 1);

        assert!(registry.release(&form.digest()));
        assert!(!registry.contains(&form));
        assert!(registry.insert(&form));
    }
}
