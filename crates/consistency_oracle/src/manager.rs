use std::sync::Arc;

use analytic_geometry::{AnalyticObject, ConstructionCatalog, Evaluation};
use core_types::{ConfigurationObject, LooseObjectLayout, ObjectId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::error::OracleError;
use crate::picture::Picture;
use crate::settings::OracleSettings;

/// How the pictures judged one batch.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchVerdict {
    /// Values for every output in every picture, none equal to an accepted object.
    Constructible(Vec<Vec<AnalyticObject>>),
    /// `(new, existing)` pairs for the outputs that every picture puts on an accepted object.
    Duplicate(Vec<(ObjectId, ObjectId)>),
    Unconstructible,
    /// The pictures disagree; the reason is kept for diagnostics.
    NeedsRetry(String),
}

/// N independent realizations of the same configuration, kept in sync object by object.
/// Cheap to clone: every candidate gets its own copy.
#[derive(Clone, Debug)]
pub struct PicturesManager {
    layout: LooseObjectLayout,
    catalog: Arc<ConstructionCatalog>,
    tolerance: f64,
    seeds: ChaCha8Rng,
    pictures: Vec<Picture>,
    loose: Vec<Arc<ConfigurationObject>>,
    accepted: Vec<Arc<ConfigurationObject>>,
    redraws: usize,
}

impl PicturesManager {
    pub fn new(
        layout: LooseObjectLayout,
        loose: Vec<Arc<ConfigurationObject>>,
        catalog: Arc<ConstructionCatalog>,
        settings: &OracleSettings,
    ) -> Result<Self, OracleError> {
        settings.validate()?;
        let mut seeds = ChaCha8Rng::seed_from_u64(settings.seed);
        let mut pictures = Vec::with_capacity(settings.number_of_pictures);
        for _ in 0..settings.number_of_pictures {
            let mut rng = ChaCha8Rng::seed_from_u64(seeds.random());
            let picture = Picture::realize(layout, &loose, &mut rng)
                .ok_or(OracleError::LayoutUnrealizable(layout))?;
            pictures.push(picture);
        }
        Ok(Self {
            layout,
            catalog,
            tolerance: settings.tolerance,
            seeds,
            pictures,
            loose,
            accepted: Vec::new(),
            redraws: 0,
        })
    }

    pub fn pictures(&self) -> &[Picture] {
        &self.pictures
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.pictures.first().is_some_and(|picture| picture.contains(id))
    }

    pub fn accepted(&self) -> &[Arc<ConfigurationObject>] {
        &self.accepted
    }

    /// Full redraws this manager (and the managers it was cloned from) went through.
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// Evaluates `batch` in every picture and compares the outcomes.
    pub fn judge(&self, batch: &[Arc<ConfigurationObject>]) -> Result<BatchVerdict, OracleError> {
        let first = batch
            .first()
            .ok_or_else(|| OracleError::MalformedBatch("empty batch".to_string()))?;
        if batch.iter().any(|object| !object.same_source(first)) {
            return Err(OracleError::MalformedBatch(
                "objects come from different construction applications".to_string(),
            ));
        }
        if let Some(present) = batch.iter().find(|object| self.contains(object.id())) {
            return Ok(BatchVerdict::Duplicate(vec![(present.id(), present.id())]));
        }

        let mut values = Vec::with_capacity(self.pictures.len());
        let mut degenerate = 0;
        for picture in &self.pictures {
            match picture.evaluate(&self.catalog, first)? {
                Evaluation::Degenerate => degenerate += 1,
                Evaluation::Constructed(outputs) => {
                    let picked = batch
                        .iter()
                        .map(|object| {
                            object
                                .output()
                                .and_then(|output| outputs.get(output).copied())
                                .ok_or_else(|| {
                                    OracleError::MalformedBatch(format!(
                                        "object {} names a missing output",
                                        object.id()
                                    ))
                                })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    values.push(picked);
                }
            }
        }
        if degenerate == self.pictures.len() {
            return Ok(BatchVerdict::Unconstructible);
        }
        if degenerate > 0 {
            return Ok(BatchVerdict::NeedsRetry(format!(
                "{degenerate} of {} pictures are degenerate",
                self.pictures.len()
            )));
        }

        let mut duplicates = Vec::new();
        for (slot, object) in batch.iter().enumerate() {
            let matches = self
                .pictures
                .iter()
                .zip(&values)
                .map(|(picture, outputs)| picture.find_equal(&outputs[slot], self.tolerance))
                .collect::<Vec<_>>();
            match matches.first().copied().flatten() {
                Some(existing) if matches.iter().all(|m| *m == Some(existing)) => {
                    duplicates.push((object.id(), existing));
                }
                None if matches.iter().all(Option::is_none) => {}
                _ => {
                    return Ok(BatchVerdict::NeedsRetry(format!(
                        "pictures disagree on what object {} coincides with: {matches:?}",
                        object.id()
                    )));
                }
            }
        }
        if duplicates.is_empty() {
            Ok(BatchVerdict::Constructible(values))
        } else {
            Ok(BatchVerdict::Duplicate(duplicates))
        }
    }

    /// Stores the values of an accepted batch; `values` holds one list per picture.
    pub fn commit(
        &mut self,
        batch: &[Arc<ConfigurationObject>],
        values: Vec<Vec<AnalyticObject>>,
    ) -> Result<(), OracleError> {
        if values.len() != self.pictures.len() || values.iter().any(|v| v.len() != batch.len()) {
            return Err(OracleError::MalformedBatch(
                "value count does not match pictures and batch".to_string(),
            ));
        }
        for (picture, outputs) in self.pictures.iter_mut().zip(values) {
            for (object, value) in batch.iter().zip(outputs) {
                picture.insert(object.id(), value);
            }
        }
        self.accepted.extend(batch.iter().cloned());
        Ok(())
    }

    /// Replaces every picture by a fresh random realization and reconstructs all
    /// accepted objects in it. Returns `false` when an accepted object degenerates
    /// or coincides with an earlier one in the new draw; the pictures are then
    /// left in an unusable state and another redraw is needed.
    pub fn redraw(&mut self) -> Result<bool, OracleError> {
        self.redraws += 1;
        let mut fresh = Vec::with_capacity(self.pictures.len());
        for _ in 0..self.pictures.len() {
            let mut rng = ChaCha8Rng::seed_from_u64(self.seeds.random());
            let Some(mut picture) = Picture::realize(self.layout, &self.loose, &mut rng) else {
                return Ok(false);
            };
            for object in &self.accepted {
                let value = match picture.evaluate(&self.catalog, object)? {
                    Evaluation::Constructed(outputs) => object
                        .output()
                        .and_then(|output| outputs.get(output).copied())
                        .ok_or(OracleError::MissingValue(object.id()))?,
                    Evaluation::Degenerate => {
                        trace!(object = %object.id(), "accepted object degenerates in redraw");
                        return Ok(false);
                    }
                };
                if let Some(existing) = picture.find_equal(&value, self.tolerance) {
                    trace!(object = %object.id(), %existing, "accepted objects coincide in redraw");
                    return Ok(false);
                }
                picture.insert(object.id(), value);
            }
            fresh.push(picture);
        }
        self.pictures = fresh;
        Ok(true)
    }
}
