use std::collections::HashMap;

use core_types::{Configuration, ConfigurationObject, LooseObjectLayout, ObjectId, ObjectKind, Permutation};

use crate::error::CanonicalFormError;

/// Defining string of `object` with loose objects relabeled by `permutation`.
/// `name_of` supplies the strings of already rendered arguments.
pub(crate) fn object_string<F>(
    layout: LooseObjectLayout,
    permutation: &Permutation,
    object: &ConfigurationObject,
    mut name_of: F,
) -> Result<String, CanonicalFormError>
where
    F: FnMut(ObjectId) -> Option<String>,
{
    match object.kind() {
        ObjectKind::Loose { index } => Ok(layout.label(permutation.image(*index))),
        ObjectKind::Constructed {
            construction,
            arguments,
            output,
        } => {
            let mut names = HashMap::new();
            for id in arguments.flatten() {
                let name = name_of(id).ok_or(CanonicalFormError::UnknownObject(id))?;
                names.insert(id, name);
            }
            let rendered = arguments.render(&mut |id| names.get(&id).cloned().unwrap_or_default());
            Ok(if construction.is_multi_output() {
                format!("{}({})[{}]", construction.name(), rendered, output)
            } else {
                format!("{}({})", construction.name(), rendered)
            })
        }
    }
}

/// Sorted strings of the constructed objects of `configuration` under `permutation`,
/// rendered without any cache.
pub(crate) fn sorted_strings(
    configuration: &Configuration,
    permutation: &Permutation,
) -> Result<Vec<String>, CanonicalFormError> {
    let layout = configuration.layout();
    let mut names: HashMap<ObjectId, String> = HashMap::new();
    let mut constructed = Vec::with_capacity(configuration.constructed_objects().len());
    for object in configuration.objects() {
        let name = object_string(layout, permutation, object, |id| names.get(&id).cloned())?;
        if !object.is_loose() {
            constructed.push(name.clone());
        }
        names.insert(object.id(), name);
    }
    constructed.sort();
    Ok(constructed)
}

/// Defining strings of every object of `configuration` with the original labels,
/// in configuration order.
pub fn object_strings(configuration: &Configuration) -> Result<Vec<(ObjectId, String)>, CanonicalFormError> {
    let layout = configuration.layout();
    let identity = Permutation::identity(layout.object_types().len());
    let mut names: HashMap<ObjectId, String> = HashMap::new();
    let mut out = Vec::new();
    for object in configuration.objects() {
        let name = object_string(layout, &identity, object, |id| names.get(&id).cloned())?;
        names.insert(object.id(), name.clone());
        out.push((object.id(), name));
    }
    Ok(out)
}
