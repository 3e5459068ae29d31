use std::collections::HashMap;
use std::sync::Arc;

use core_types::{Configuration, ConfigurationId, ObjectId, Permutation};
use identity_store::IdentityStore;

use crate::error::CanonicalFormError;

/// The configuration obtained by renaming loose object `i` to loose object `π(i)`
/// and rebuilding every constructed object on the renamed arguments.
pub fn relabel_configuration(
    store: &IdentityStore,
    configuration: &Configuration,
    permutation: &Permutation,
    id: ConfigurationId,
) -> Result<Configuration, CanonicalFormError> {
    let loose = configuration.loose_objects();
    if permutation.len() != loose.len() {
        return Err(CanonicalFormError::PermutationSize {
            expected: loose.len(),
            actual: permutation.len(),
        });
    }

    let mut images: HashMap<ObjectId, ObjectId> = loose
        .iter()
        .enumerate()
        .map(|(index, object)| (object.id(), loose[permutation.image(index)].id()))
        .collect();

    let mut constructed = Vec::with_capacity(configuration.constructed_objects().len());
    for object in configuration.constructed_objects() {
        let (Some(construction), Some(arguments), Some(output)) =
            (object.construction(), object.arguments(), object.output())
        else {
            continue;
        };
        if let Some(missing) = arguments
            .flatten()
            .into_iter()
            .find(|dependency| !images.contains_key(dependency))
        {
            return Err(CanonicalFormError::UnknownObject(missing));
        }
        let renamed = arguments.map_objects(|dependency| images.get(&dependency).copied().unwrap_or(dependency));
        let outputs = store.construct(construction, &renamed)?;
        let image = outputs
            .get(output)
            .cloned()
            .ok_or(CanonicalFormError::UnknownObject(object.id()))?;
        images.insert(object.id(), image.id());
        constructed.push(Arc::clone(&image));
    }

    Ok(Configuration::new(id, configuration.layout(), loose.to_vec(), constructed)?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use core_types::{
        Argument, Arguments, Configuration, ConfigurationId, Construction, LooseObjectLayout,
        Permutation, PredefinedConstructionType,
    };
    use identity_store::IdentityStore;

    use super::relabel_configuration;
    use crate::render::sorted_strings;

    #[test]
    fn relabeling_renames_through_nested_objects() {
        let store = IdentityStore::new();
        let loose = store.loose_objects(LooseObjectLayout::Triangle);
        let midpoint = Construction::predefined(PredefinedConstructionType::Midpoint);
        let m = store
            .construct(
                &midpoint,
                &Arguments::new(vec![Argument::Set(vec![
                    Argument::Object(loose[0].id()),
                    Argument::Object(loose[1].id()),
                ])]),
            )
            .expect("midpoint");
        let line = Construction::predefined(PredefinedConstructionType::LineFromPoints);
        let l = store
            .construct(
                &line,
                &Arguments::new(vec![Argument::Set(vec![
                    Argument::Object(m[0].id()),
                    Argument::Object(loose[2].id()),
                ])]),
            )
            .expect("line");
        let configuration = Configuration::new(
            ConfigurationId::from_u64(0),
            LooseObjectLayout::Triangle,
            loose,
            vec![Arc::clone(&m[0]), Arc::clone(&l[0])],
        )
        .expect("configuration");

        let rotation = Permutation::from_images(vec![1, 2, 0]).expect("rotation");
        let relabeled =
            relabel_configuration(&store, &configuration, &rotation, ConfigurationId::from_u64(1))
                .expect("relabel");
        let strings = sorted_strings(&relabeled, &Permutation::identity(3)).expect("render");
        assert_eq!(
            strings,
            vec![
                "LineFromPoints({A,Midpoint({B,C})})".to_string(),
                "Midpoint({B,C})".to_string(),
            ]
        );
        assert_eq!(strings, sorted_strings(&configuration, &rotation).expect("render"));
    }

    #[test]
    fn permutation_size_is_checked() {
        let store = IdentityStore::new();
        let loose = store.loose_objects(LooseObjectLayout::Triangle);
        let configuration =
            Configuration::new(ConfigurationId::from_u64(0), LooseObjectLayout::Triangle, loose, Vec::new())
                .expect("configuration");
        let err = relabel_configuration(
            &store,
            &configuration,
            &Permutation::identity(2),
            ConfigurationId::from_u64(1),
        )
        .expect_err("wrong size");
        assert!(matches!(err, crate::CanonicalFormError::PermutationSize { expected: 3, actual: 2 }));
    }
}
