use std::collections::HashMap;
use std::sync::Arc;

use core_types::{Configuration, ConfigurationId, ConfigurationObject, LooseObjectLayout, ObjectId, Permutation};
use parking_lot::RwLock;
use tracing::trace;

use crate::error::CanonicalFormError;
use crate::form::{CanonicalForm, join};
use crate::render::object_string;

/// Sorted constructed-object strings of one configuration, one list per permutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormEntry {
    renderings: Vec<Vec<String>>,
}

impl FormEntry {
    fn canonical_form(&self) -> CanonicalForm {
        let smallest = self
            .renderings
            .iter()
            .map(|sorted| join(sorted))
            .min()
            .unwrap_or_default();
        CanonicalForm::from_rendering(smallest)
    }

    /// Rendering under the identity permutation.
    pub fn identity_rendering(&self) -> &[String] {
        self.renderings.first().map_or(&[], Vec::as_slice)
    }

    pub fn renderings(&self) -> &[Vec<String>] {
        &self.renderings
    }
}

/// Canonical form of a candidate plus the cache entry to keep if it is accepted.
#[derive(Clone, Debug)]
pub struct ExtendedForm {
    pub form: CanonicalForm,
    pub entry: FormEntry,
}

/// Computes isomorph-rejection keys for the configurations of one layout.
///
/// Object strings are memoized per permutation by object identity, and the sorted
/// string lists of accepted configurations are cached so a child only renders the
/// objects it adds. Safe to share between worker threads.
#[derive(Debug)]
pub struct CanonicalFormResolver {
    layout: LooseObjectLayout,
    permutations: Vec<Permutation>,
    names: Vec<RwLock<HashMap<ObjectId, String>>>,
    forms: RwLock<HashMap<ConfigurationId, FormEntry>>,
}

impl CanonicalFormResolver {
    /// Resolver over every symmetry of `layout`.
    pub fn new(layout: LooseObjectLayout) -> Self {
        Self::with_permutations(layout, layout.symmetry_permutations())
    }

    /// Resolver that only merges literally equal configurations.
    pub fn identity_only(layout: LooseObjectLayout) -> Self {
        Self::with_permutations(layout, vec![Permutation::identity(layout.object_types().len())])
    }

    fn with_permutations(layout: LooseObjectLayout, permutations: Vec<Permutation>) -> Self {
        Self {
            layout,
            names: permutations.iter().map(|_| RwLock::new(HashMap::new())).collect(),
            permutations,
            forms: RwLock::new(HashMap::new()),
        }
    }

    pub fn layout(&self) -> LooseObjectLayout {
        self.layout
    }

    pub fn permutations(&self) -> &[Permutation] {
        &self.permutations
    }

    fn name(&self, slot: usize, object: &ConfigurationObject) -> Result<String, CanonicalFormError> {
        if let Some(name) = self.names[slot].read().get(&object.id()) {
            return Ok(name.clone());
        }
        let name = {
            let names = self.names[slot].read();
            object_string(self.layout, &self.permutations[slot], object, |id| names.get(&id).cloned())?
        };
        self.names[slot].write().insert(object.id(), name.clone());
        Ok(name)
    }

    /// Renders a configuration from scratch and caches it. Used for the initial
    /// configuration of a run; every later configuration goes through [`Self::extend`].
    pub fn resolve_root(&self, configuration: &Configuration) -> Result<CanonicalForm, CanonicalFormError> {
        let mut renderings = Vec::with_capacity(self.permutations.len());
        for slot in 0..self.permutations.len() {
            let mut sorted = Vec::with_capacity(configuration.constructed_objects().len());
            for object in configuration.objects() {
                let name = self.name(slot, object)?;
                if !object.is_loose() {
                    sorted.push(name);
                }
            }
            sorted.sort();
            renderings.push(sorted);
        }
        let entry = FormEntry { renderings };
        let form = entry.canonical_form();
        self.forms.write().insert(configuration.id(), entry);
        Ok(form)
    }

    /// Canonical form of the parent configuration extended by `new_objects`.
    /// Nothing is cached until [`Self::commit`] is called with the returned entry.
    pub fn extend(
        &self,
        parent: ConfigurationId,
        new_objects: &[Arc<ConfigurationObject>],
    ) -> Result<ExtendedForm, CanonicalFormError> {
        let mut renderings = self
            .forms
            .read()
            .get(&parent)
            .map(|entry| entry.renderings.clone())
            .ok_or(CanonicalFormError::ParentNotCached(parent))?;

        for (slot, sorted) in renderings.iter_mut().enumerate() {
            for object in new_objects {
                let name = self.name(slot, object)?;
                let at = sorted.binary_search(&name).unwrap_or_else(|at| at);
                sorted.insert(at, name);
            }
        }
        let entry = FormEntry { renderings };
        let form = entry.canonical_form();
        trace!(?parent, %form, "extended canonical form");
        Ok(ExtendedForm { form, entry })
    }

    /// Keeps the entry of an accepted configuration so its children can be extended.
    pub fn commit(&self, configuration: ConfigurationId, entry: FormEntry) {
        self.forms.write().insert(configuration, entry);
    }

    /// Drops the cached entry of a configuration whose children are all processed.
    pub fn forget(&self, configuration: ConfigurationId) {
        self.forms.write().remove(&configuration);
    }

    pub fn cached(&self, configuration: ConfigurationId) -> Option<FormEntry> {
        self.forms.read().get(&configuration).cloned()
    }

    pub fn cached_count(&self) -> usize {
        self.forms.read().len()
    }
}

/// Canonical form of `configuration` over the given permutations, without caching.
pub fn canonical_form(
    configuration: &Configuration,
    permutations: &[Permutation],
) -> Result<CanonicalForm, CanonicalFormError> {
    let expected = configuration.layout().object_types().len();
    let mut renderings = Vec::with_capacity(permutations.len());
    for permutation in permutations {
        if permutation.len() != expected {
            return Err(CanonicalFormError::PermutationSize {
                expected,
                actual: permutation.len(),
            });
        }
        renderings.push(crate::render::sorted_strings(configuration, permutation)?);
    }
    Ok(FormEntry { renderings }.canonical_form())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use core_types::{
        Argument, Arguments, Configuration, ConfigurationId, ConfigurationObject, Construction,
        LooseObjectLayout, PredefinedConstructionType,
    };
    use identity_store::IdentityStore;

    use super::{CanonicalFormResolver, canonical_form};
    use crate::error::CanonicalFormError;

    struct Fixture {
        store: IdentityStore,
        root: Arc<Configuration>,
    }

    fn triangle() -> Fixture {
        let store = IdentityStore::new();
        let loose = store.loose_objects(LooseObjectLayout::Triangle);
        let root = Arc::new(
            Configuration::new(ConfigurationId::from_u64(0), LooseObjectLayout::Triangle, loose, Vec::new())
                .expect("triangle"),
        );
        Fixture { store, root }
    }

    fn midpoint(fixture: &Fixture, a: usize, b: usize) -> Arc<ConfigurationObject> {
        let loose = fixture.root.loose_objects();
        let arguments = Arguments::new(vec![Argument::Set(vec![
            Argument::Object(loose[a].id()),
            Argument::Object(loose[b].id()),
        ])]);
        fixture
            .store
            .construct(&Construction::predefined(PredefinedConstructionType::Midpoint), &arguments)
            .expect("midpoint")
            .remove(0)
    }

    #[test]
    fn symmetric_midpoints_share_a_form() {
        let fixture = triangle();
        let resolver = CanonicalFormResolver::new(LooseObjectLayout::Triangle);
        resolver.resolve_root(&fixture.root).expect("root");

        let ab = resolver.extend(fixture.root.id(), &[midpoint(&fixture, 0, 1)]).expect("ab");
        let bc = resolver.extend(fixture.root.id(), &[midpoint(&fixture, 1, 2)]).expect("bc");
        let ca = resolver.extend(fixture.root.id(), &[midpoint(&fixture, 2, 0)]).expect("ca");
        assert_eq!(ab.form, bc.form);
        assert_eq!(bc.form, ca.form);
        assert_eq!(ab.form.as_str(), "Midpoint({A,B})");
    }

    #[test]
    fn identity_only_keeps_relabelings_apart() {
        let fixture = triangle();
        let resolver = CanonicalFormResolver::identity_only(LooseObjectLayout::Triangle);
        resolver.resolve_root(&fixture.root).expect("root");

        let ab = resolver.extend(fixture.root.id(), &[midpoint(&fixture, 0, 1)]).expect("ab");
        let bc = resolver.extend(fixture.root.id(), &[midpoint(&fixture, 1, 2)]).expect("bc");
        assert_ne!(ab.form, bc.form);
        assert_eq!(bc.form.as_str(), "Midpoint({B,C})");
    }

    #[test]
    fn extension_requires_a_cached_parent() {
        let fixture = triangle();
        let resolver = CanonicalFormResolver::new(LooseObjectLayout::Triangle);
        let err = resolver
            .extend(fixture.root.id(), &[midpoint(&fixture, 0, 1)])
            .expect_err("parent never resolved");
        assert_eq!(err, CanonicalFormError::ParentNotCached(fixture.root.id()));
    }

    #[test]
    fn incremental_forms_match_full_rendering() {
        let fixture = triangle();
        let resolver = CanonicalFormResolver::new(LooseObjectLayout::Triangle);
        resolver.resolve_root(&fixture.root).expect("root");

        let first = vec![midpoint(&fixture, 0, 1)];
        let extended = resolver.extend(fixture.root.id(), &first).expect("first");
        let child = Arc::new(
            Configuration::derive(&fixture.root, ConfigurationId::from_u64(1), first).expect("child"),
        );
        resolver.commit(child.id(), extended.entry);

        let second = vec![midpoint(&fixture, 1, 2)];
        let grandchild_form = resolver.extend(child.id(), &second).expect("second").form;
        let grandchild =
            Configuration::derive(&child, ConfigurationId::from_u64(2), second).expect("grandchild");

        let full = canonical_form(&grandchild, resolver.permutations()).expect("full");
        assert_eq!(grandchild_form, full);
        assert_eq!(full.as_str(), "Midpoint({A,B})|Midpoint({A,C})");

        resolver.forget(child.id());
        assert!(resolver.cached(child.id()).is_none());
        assert_eq!(resolver.cached_count(), 1);
    }
}
