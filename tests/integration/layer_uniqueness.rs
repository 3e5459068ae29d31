use std::collections::{BTreeMap, HashSet};

use canonical_form::canonical_form;
use configuration_generator::GenerationSettings;
use core_types::{ConfigurationId, LooseObjectLayout, PredefinedConstructionType};
use integration_tests::Scenario;

#[test]
fn no_two_configurations_of_a_layer_share_a_canonical_form() {
    let scenario = Scenario::new(GenerationSettings::default());
    let triangle = scenario.bare(LooseObjectLayout::Triangle).expect("triangle");
    let constructions = [
        PredefinedConstructionType::Midpoint,
        PredefinedConstructionType::LineFromPoints,
        PredefinedConstructionType::PerpendicularBisector,
    ];
    let (generated, statistics) = scenario.run(scenario.input(triangle, &constructions, 2)).expect("run");

    let mut layers: BTreeMap<usize, HashSet<String>> = BTreeMap::new();
    for g in &generated {
        let fresh = layers
            .entry(g.iteration())
            .or_default()
            .insert(g.canonical_form.as_str().to_string());
        assert!(fresh, "{} emitted twice", g.canonical_form);
    }
    assert_eq!(layers.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    for (iteration, forms) in &layers {
        assert_eq!(statistics.layer(*iteration).map(|layer| layer.emitted), Some(forms.len()));
    }
}

#[test]
fn emitted_forms_match_a_full_recomputation() {
    let scenario = Scenario::new(GenerationSettings::default());
    let triangle = scenario.bare(LooseObjectLayout::Triangle).expect("triangle");
    let constructions = [
        PredefinedConstructionType::Midpoint,
        PredefinedConstructionType::PerpendicularDrop,
    ];
    let (generated, _) = scenario.run(scenario.input(triangle, &constructions, 2)).expect("run");
    assert!(!generated.is_empty());

    let permutations = LooseObjectLayout::Triangle.symmetry_permutations();
    for g in &generated {
        let full = canonical_form(&g.configuration, &permutations).expect("form");
        assert_eq!(full, g.canonical_form);
    }
}

#[test]
fn every_child_extends_an_emitted_parent() {
    let scenario = Scenario::new(GenerationSettings::default());
    let triangle = scenario.bare(LooseObjectLayout::Triangle).expect("triangle");
    let (generated, _) = scenario
        .run(scenario.input(triangle, &[PredefinedConstructionType::Midpoint], 3))
        .expect("run");

    let mut known: HashSet<ConfigurationId> = HashSet::from([ConfigurationId::from_u64(0)]);
    for g in &generated {
        let parent = g.parent().expect("generated configurations have parents");
        assert!(known.contains(&parent), "parent {parent:?} not emitted before {:?}", g.configuration.id());
        let parent_configuration = g.configuration.parent().expect("parent");
        assert_eq!(parent_configuration.iteration() + 1, g.iteration());
        assert!(known.insert(g.configuration.id()));
    }
}
