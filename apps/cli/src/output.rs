use std::collections::HashMap;

use canonical_form::{CanonicalFormError, object_strings};
use configuration_generator::{GeneratedConfiguration, GenerationStatistics};
use core_types::{Construction, PredefinedConstructionType, standard_composed_constructions};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Serialize)]
pub struct ConfigurationReport {
    pub id: u64,
    pub parent: Option<u64>,
    pub iteration: usize,
    pub canonical_form: String,
    pub digest: String,
    /// Objects added by the last construction step.
    pub new_objects: Vec<String>,
}

impl ConfigurationReport {
    pub fn from_generated(generated: &GeneratedConfiguration) -> Result<Self, CanonicalFormError> {
        let configuration = &generated.configuration;
        let names = object_strings(configuration)?.into_iter().collect::<HashMap<_, _>>();
        let new_objects = configuration
            .newest_objects()
            .iter()
            .filter_map(|object| names.get(&object.id()).cloned())
            .collect();
        Ok(Self {
            id: configuration.id().as_u64(),
            parent: generated.parent().map(|parent| parent.as_u64()),
            iteration: generated.iteration(),
            canonical_form: generated.canonical_form.to_string(),
            digest: generated.canonical_form.digest_hex(),
            new_objects,
        })
    }

    pub fn line(&self) -> String {
        format!(
            "[{}] #{} <- #{}: {}",
            self.iteration,
            self.id,
            self.parent.map_or_else(|| "-".to_string(), |parent| parent.to_string()),
            self.new_objects.join(", ")
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ConstructionEntry {
    pub name: String,
    pub signature: String,
    pub outputs: Vec<String>,
    pub composed: bool,
}

impl ConstructionEntry {
    fn of(construction: &Construction, composed: bool) -> Self {
        Self {
            name: construction.name().to_string(),
            signature: construction.signature().to_string(),
            outputs: construction
                .outputs()
                .iter()
                .map(|output| output.letter().to_string())
                .collect(),
            composed,
        }
    }
}

pub fn construction_entries() -> Vec<ConstructionEntry> {
    let predefined = PredefinedConstructionType::ALL
        .into_iter()
        .map(|kind| ConstructionEntry::of(&Construction::predefined(kind), false));
    let composed = standard_composed_constructions()
        .into_iter()
        .map(|construction| ConstructionEntry::of(&construction, true));
    predefined.chain(composed).collect()
}

pub fn statistics_text(statistics: &GenerationStatistics) -> String {
    let mut out = String::from("[Statistics]");
    for layer in &statistics.layers {
        out.push_str(&format!(
            "\nlayer {}: candidates={} emitted={} filtered={} rejected={} (present={} cached={} isomorphic={} unconstructible={} duplicate={} inconsistent={}) redraws={}",
            layer.iteration,
            layer.candidates,
            layer.emitted,
            layer.filtered_out,
            layer.rejected(),
            layer.already_present,
            layer.cached_unconstructible,
            layer.isomorphic_duplicates,
            layer.unconstructible,
            layer.geometric_duplicates,
            layer.inconsistent,
            layer.redraws,
        ));
    }
    out
}

pub fn run_data(configurations: &[ConfigurationReport], statistics: &GenerationStatistics, truncated: bool) -> Value {
    json!({
        "configurations": configurations,
        "statistics": statistics,
        "truncated": truncated,
    })
}
