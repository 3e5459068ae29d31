use std::collections::BTreeMap;
use std::sync::Arc;

use analytic_geometry::{AnalyticObject, ConstructionCatalog, Evaluation, realize_layout};
use core_types::{ConfigurationObject, LooseObjectLayout, ObjectId, ObjectKind};
use rand::Rng;

use crate::error::OracleError;

/// One numeric realization: a value for every object accepted so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Picture {
    values: BTreeMap<ObjectId, AnalyticObject>,
}

impl Picture {
    /// Random values for the loose objects of `layout`. `None` when no
    /// well-shaped draw was found.
    pub fn realize<R: Rng + ?Sized>(
        layout: LooseObjectLayout,
        loose_objects: &[Arc<ConfigurationObject>],
        rng: &mut R,
    ) -> Option<Self> {
        let values = realize_layout(layout, rng)?;
        if values.len() != loose_objects.len() {
            return None;
        }
        Some(Self {
            values: loose_objects
                .iter()
                .map(|object| object.id())
                .zip(values)
                .collect(),
        })
    }

    pub fn value(&self, id: ObjectId) -> Option<AnalyticObject> {
        self.values.get(&id).copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.values.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn insert(&mut self, id: ObjectId, value: AnalyticObject) {
        self.values.insert(id, value);
    }

    /// Evaluates the construction that defines `object` on this picture's values.
    /// Returns every output of the construction, not just the one `object` stands for.
    pub fn evaluate(
        &self,
        catalog: &ConstructionCatalog,
        object: &ConfigurationObject,
    ) -> Result<Evaluation, OracleError> {
        let ObjectKind::Constructed {
            construction,
            arguments,
            ..
        } = object.kind()
        else {
            return Err(OracleError::MalformedBatch(format!(
                "loose object {} cannot be constructed",
                object.id()
            )));
        };
        let inputs = arguments
            .flatten()
            .into_iter()
            .map(|id| self.value(id).ok_or(OracleError::MissingValue(id)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(catalog.evaluate(construction, &inputs)?)
    }

    /// The accepted object numerically equal to `value`, smallest identity first.
    pub fn find_equal(&self, value: &AnalyticObject, tolerance: f64) -> Option<ObjectId> {
        self.values
            .iter()
            .find(|(_, existing)| existing.approx_eq(value, tolerance))
            .map(|(id, _)| *id)
    }
}
