use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Why a candidate of one layer did not make it into the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rejection {
    AlreadyPresent,
    CachedUnconstructible,
    IsomorphicDuplicate,
    Unconstructible,
    GeometricDuplicate,
    Inconsistent,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStatistics {
    pub iteration: usize,
    /// Construction applications tried in this layer.
    pub candidates: usize,
    pub already_present: usize,
    pub cached_unconstructible: usize,
    pub isomorphic_duplicates: usize,
    pub unconstructible: usize,
    pub geometric_duplicates: usize,
    pub inconsistent: usize,
    pub filtered_out: usize,
    pub emitted: usize,
    /// Configurations queued for the next layer.
    pub extended: usize,
    pub redraws: usize,
}

impl LayerStatistics {
    pub fn new(iteration: usize) -> Self {
        Self {
            iteration,
            ..Self::default()
        }
    }

    pub(crate) fn reject(&mut self, rejection: Rejection) {
        let counter = match rejection {
            Rejection::AlreadyPresent => &mut self.already_present,
            Rejection::CachedUnconstructible => &mut self.cached_unconstructible,
            Rejection::IsomorphicDuplicate => &mut self.isomorphic_duplicates,
            Rejection::Unconstructible => &mut self.unconstructible,
            Rejection::GeometricDuplicate => &mut self.geometric_duplicates,
            Rejection::Inconsistent => &mut self.inconsistent,
        };
        *counter += 1;
    }

    /// Candidates that passed every check, emitted or filtered out.
    pub fn valid(&self) -> usize {
        self.emitted + self.filtered_out
    }

    pub fn rejected(&self) -> usize {
        self.already_present
            + self.cached_unconstructible
            + self.isomorphic_duplicates
            + self.unconstructible
            + self.geometric_duplicates
            + self.inconsistent
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStatistics {
    /// Redraws spent registering the initial configuration.
    pub initial_redraws: usize,
    pub layers: Vec<LayerStatistics>,
}

impl GenerationStatistics {
    pub fn emitted(&self) -> usize {
        self.layers.iter().map(|layer| layer.emitted).sum()
    }

    pub fn candidates(&self) -> usize {
        self.layers.iter().map(|layer| layer.candidates).sum()
    }

    pub fn redraws(&self) -> usize {
        self.initial_redraws + self.layers.iter().map(|layer| layer.redraws).sum::<usize>()
    }

    pub fn layer(&self, iteration: usize) -> Option<&LayerStatistics> {
        self.layers.iter().find(|layer| layer.iteration == iteration)
    }

    pub(crate) fn layer_mut(&mut self, iteration: usize) -> &mut LayerStatistics {
        if let Some(at) = self.layers.iter().position(|layer| layer.iteration == iteration) {
            return &mut self.layers[at];
        }
        self.layers.push(LayerStatistics::new(iteration));
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }
}

/// Shared view of the counters of a running generation; outlives the run iterator.
#[derive(Clone, Debug, Default)]
pub struct StatisticsHandle(Arc<Mutex<GenerationStatistics>>);

impl StatisticsHandle {
    pub fn snapshot(&self) -> GenerationStatistics {
        self.0.lock().clone()
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut GenerationStatistics) -> R) -> R {
        f(&mut self.0.lock())
    }
}
