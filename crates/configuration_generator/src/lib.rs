//! Layered generation of geometric configurations.
//!
//! Every configuration of a layer is extended by one construction application.
//! Candidates are canonicalized, deduplicated within the layer, validated in
//! several numeric pictures and then emitted lazily through [`GenerationRun`].

mod error;
mod filter;
mod generator;
mod input;
mod registry;
mod settings;
mod statistics;

pub use error::GeneratorError;
pub use filter::{ConfigurationFilter, SymmetryFilter, SymmetryGenerationMode};
pub use generator::{ConfigurationGenerator, GeneratedConfiguration, GenerationRun};
pub use input::{GeneratorInput, InitialConfigurationBuilder};
pub use registry::LayerRegistry;
pub use settings::GenerationSettings;
pub use statistics::{GenerationStatistics, LayerStatistics, StatisticsHandle};
