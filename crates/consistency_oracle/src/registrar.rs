use std::sync::Arc;

use core_types::{Configuration, ConfigurationObject, ObjectId};
use tracing::{debug, warn};

use crate::cache::OutcomeCache;
use crate::error::OracleError;
use crate::manager::{BatchVerdict, PicturesManager};
use crate::settings::OracleSettings;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The batch was added to every picture.
    Constructible,
    /// `(new, existing)` pairs of outputs that coincide with accepted objects.
    Duplicate(Vec<(ObjectId, ObjectId)>),
    Unconstructible,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub outcome: RegistrationOutcome,
    /// Full redraws performed while registering this batch.
    pub redraws: usize,
    /// Whether the outcome came from the cache without touching the pictures.
    pub cached: bool,
}

impl Registration {
    fn cached(outcome: RegistrationOutcome) -> Self {
        Self {
            outcome,
            redraws: 0,
            cached: true,
        }
    }
}

/// Runs the redraw-and-retry protocol over a [`PicturesManager`] and caches the
/// outcomes that hold in every configuration.
#[derive(Debug)]
pub struct Registrar {
    maximal_redraw_attempts: usize,
    cache: Arc<OutcomeCache>,
}

impl Registrar {
    pub fn new(settings: &OracleSettings, cache: Arc<OutcomeCache>) -> Self {
        Self {
            maximal_redraw_attempts: settings.maximal_redraw_attempts,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<OutcomeCache> {
        &self.cache
    }

    /// Classifies the objects of one construction application and, when they are
    /// new and constructible, adds them to every picture of `manager`.
    pub fn register(
        &self,
        manager: &mut PicturesManager,
        batch: &[Arc<ConfigurationObject>],
    ) -> Result<Registration, OracleError> {
        if self.cache.is_unconstructible(batch) {
            return Ok(Registration::cached(RegistrationOutcome::Unconstructible));
        }
        if let Some(pairs) = self.cache.duplicates_of(batch, |id| manager.contains(id)) {
            return Ok(Registration::cached(RegistrationOutcome::Duplicate(pairs)));
        }

        let mut redraws = 0;
        loop {
            match manager.judge(batch)? {
                BatchVerdict::Constructible(values) => {
                    manager.commit(batch, values)?;
                    return Ok(Registration {
                        outcome: RegistrationOutcome::Constructible,
                        redraws,
                        cached: false,
                    });
                }
                BatchVerdict::Duplicate(pairs) => {
                    self.cache.record_duplicates(&pairs);
                    return Ok(Registration {
                        outcome: RegistrationOutcome::Duplicate(pairs),
                        redraws,
                        cached: false,
                    });
                }
                BatchVerdict::Unconstructible => {
                    self.cache.mark_unconstructible(batch);
                    return Ok(Registration {
                        outcome: RegistrationOutcome::Unconstructible,
                        redraws,
                        cached: false,
                    });
                }
                BatchVerdict::NeedsRetry(reason) => {
                    if !self.redraw_until_usable(manager, &mut redraws, &reason)? {
                        let objects = batch.iter().map(|object| object.id()).collect::<Vec<_>>();
                        warn!(?objects, attempts = redraws, %reason, "pictures stayed inconsistent");
                        return Err(OracleError::Inconsistent {
                            objects,
                            attempts: redraws,
                        });
                    }
                }
            }
        }
    }

    /// Redraws until the accepted objects reconstruct cleanly. `false` once the
    /// attempt budget is spent.
    fn redraw_until_usable(
        &self,
        manager: &mut PicturesManager,
        redraws: &mut usize,
        reason: &str,
    ) -> Result<bool, OracleError> {
        while *redraws < self.maximal_redraw_attempts {
            *redraws += 1;
            debug!(attempt = *redraws, reason, "redrawing pictures");
            if manager.redraw()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Registers the constructed objects of an initial configuration, one
    /// construction application at a time. Anything but a clean acceptance is fatal.
    pub fn register_configuration(
        &self,
        manager: &mut PicturesManager,
        configuration: &Configuration,
    ) -> Result<usize, OracleError> {
        let mut redraws = 0;
        for batch in batches(configuration.constructed_objects()) {
            let registration = self
                .register(manager, batch)
                .map_err(|err| OracleError::InitialConfiguration(err.to_string()))?;
            redraws += registration.redraws;
            match registration.outcome {
                RegistrationOutcome::Constructible => {}
                RegistrationOutcome::Duplicate(pairs) => {
                    return Err(OracleError::InitialConfiguration(format!(
                        "objects coincide with earlier ones: {pairs:?}"
                    )));
                }
                RegistrationOutcome::Unconstructible => {
                    return Err(OracleError::InitialConfiguration(format!(
                        "object {} cannot be constructed",
                        batch[0].id()
                    )));
                }
            }
        }
        Ok(redraws)
    }
}

/// Splits consecutive objects into groups produced by the same construction application.
fn batches(objects: &[Arc<ConfigurationObject>]) -> Vec<&[Arc<ConfigurationObject>]> {
    let mut out = Vec::new();
    let mut start = 0;
    for end in 1..=objects.len() {
        if end == objects.len() || !objects[end].same_source(&objects[start]) {
            out.push(&objects[start..end]);
            start = end;
        }
    }
    out
}
