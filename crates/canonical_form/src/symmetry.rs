use std::collections::HashMap;

use core_types::{Configuration, Permutation};

use crate::error::CanonicalFormError;
use crate::render::sorted_strings;

/// Number of objects missing from `configuration` for it to be mapped onto itself
/// by `permutation`.
pub fn symmetry_defect(
    configuration: &Configuration,
    permutation: &Permutation,
) -> Result<usize, CanonicalFormError> {
    let identity = sorted_strings(configuration, &Permutation::identity(permutation.len()))?;
    let image = sorted_strings(configuration, permutation)?;

    let mut available: HashMap<&str, usize> = HashMap::new();
    for name in &identity {
        *available.entry(name.as_str()).or_insert(0) += 1;
    }
    let mut missing = 0;
    for name in &image {
        match available.get_mut(name.as_str()) {
            Some(count) if *count > 0 => *count -= 1,
            _ => missing += 1,
        }
    }
    Ok(missing)
}

pub fn is_symmetric_under(
    configuration: &Configuration,
    permutation: &Permutation,
) -> Result<bool, CanonicalFormError> {
    Ok(symmetry_defect(configuration, permutation)? == 0)
}

/// The layout symmetries under which `configuration` is mapped onto itself, identity included.
pub fn symmetric_permutations(configuration: &Configuration) -> Result<Vec<Permutation>, CanonicalFormError> {
    let mut out = Vec::new();
    for permutation in configuration.layout().symmetry_permutations() {
        if is_symmetric_under(configuration, &permutation)? {
            out.push(permutation);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use core_types::{
        Argument, Arguments, Configuration, ConfigurationId, ConfigurationObject, Construction,
        LooseObjectLayout, Permutation, PredefinedConstructionType,
    };
    use identity_store::IdentityStore;

    use super::{is_symmetric_under, symmetric_permutations, symmetry_defect};

    fn midpoints(store: &IdentityStore, loose: &[Arc<ConfigurationObject>], pairs: &[(usize, usize)]) -> Vec<Arc<ConfigurationObject>> {
        let midpoint = Construction::predefined(PredefinedConstructionType::Midpoint);
        pairs
            .iter()
            .map(|(a, b)| {
                let arguments = Arguments::new(vec![Argument::Set(vec![
                    Argument::Object(loose[*a].id()),
                    Argument::Object(loose[*b].id()),
                ])]);
                store.construct(&midpoint, &arguments).expect("midpoint").remove(0)
            })
            .collect()
    }

    fn triangle_with(pairs: &[(usize, usize)]) -> Configuration {
        let store = IdentityStore::new();
        let loose = store.loose_objects(LooseObjectLayout::Triangle);
        let constructed = midpoints(&store, &loose, pairs);
        Configuration::new(ConfigurationId::from_u64(0), LooseObjectLayout::Triangle, loose, constructed)
            .expect("configuration")
    }

    #[test]
    fn medial_triangle_is_fully_symmetric() {
        let configuration = triangle_with(&[(0, 1), (1, 2), (0, 2)]);
        assert_eq!(symmetric_permutations(&configuration).expect("symmetries").len(), 6);
    }

    #[test]
    fn single_midpoint_is_symmetric_under_its_swap_only() {
        let configuration = triangle_with(&[(0, 1)]);
        let symmetries = symmetric_permutations(&configuration).expect("symmetries");
        assert_eq!(symmetries.len(), 2);
        let swap = Permutation::from_images(vec![1, 0, 2]).expect("swap");
        assert!(is_symmetric_under(&configuration, &swap).expect("check"));

        let rotation = Permutation::from_images(vec![1, 2, 0]).expect("rotation");
        assert_eq!(symmetry_defect(&configuration, &rotation).expect("defect"), 1);
    }
}
