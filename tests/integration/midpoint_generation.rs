use std::collections::BTreeSet;

use configuration_generator::GenerationSettings;
use core_types::{LooseObjectLayout, PredefinedConstructionType};
use integration_tests::{Scenario, sequential};

#[test]
fn triangle_midpoints_without_isomorph_rejection() {
    let scenario = Scenario::new(GenerationSettings {
        isomorph_rejection: false,
        ..GenerationSettings::default()
    });
    let triangle = scenario.bare(LooseObjectLayout::Triangle).expect("triangle");
    let input = scenario.input(triangle, &[PredefinedConstructionType::Midpoint], 1);
    let (generated, statistics) = scenario.run(input).expect("run");

    assert_eq!(generated.len(), 3);
    let forms = generated
        .iter()
        .map(|g| g.canonical_form.as_str().to_string())
        .collect::<BTreeSet<_>>();
    assert_eq!(
        forms.into_iter().collect::<Vec<_>>(),
        vec!["Midpoint({A,B})", "Midpoint({A,C})", "Midpoint({B,C})"]
    );
    for g in &generated {
        assert_eq!(g.iteration(), 1);
        assert_eq!(g.configuration.constructed_objects().len(), 1);
        assert_eq!(g.configuration.newest_objects().len(), 1);
    }
    assert_eq!(statistics.emitted(), 3);
    assert_eq!(statistics.layer(1).map(|layer| layer.isomorphic_duplicates), Some(0));
}

#[test]
fn triangle_midpoints_with_isomorph_rejection() {
    let scenario = Scenario::new(GenerationSettings::default());
    let triangle = scenario.bare(LooseObjectLayout::Triangle).expect("triangle");
    let input = scenario.input(triangle, &[PredefinedConstructionType::Midpoint], 1);
    let (generated, statistics) = scenario.run(input).expect("run");

    assert_eq!(generated.len(), 1);
    assert_eq!(statistics.layer(1).map(|layer| layer.isomorphic_duplicates), Some(2));
}

#[test]
fn cyclic_quadrilateral_splits_sides_from_diagonals() {
    let scenario = Scenario::new(sequential());
    let quadrilateral = scenario.bare(LooseObjectLayout::CyclicQuadrilateral).expect("quadrilateral");
    let input = scenario.input(quadrilateral, &[PredefinedConstructionType::Midpoint], 1);
    let (generated, _) = scenario.run(input).expect("run");

    let forms = generated
        .iter()
        .map(|g| g.canonical_form.as_str().to_string())
        .collect::<BTreeSet<_>>();
    assert_eq!(
        forms.into_iter().collect::<Vec<_>>(),
        vec!["Midpoint({A,B})", "Midpoint({A,C})"]
    );
}

#[test]
fn runs_are_reproducible_and_independent_of_parallelism() {
    let constructions = [
        PredefinedConstructionType::Midpoint,
        PredefinedConstructionType::LineFromPoints,
        PredefinedConstructionType::IntersectionOfLines,
    ];
    let forms = |settings: GenerationSettings| {
        let scenario = Scenario::new(settings);
        let triangle = scenario.bare(LooseObjectLayout::Triangle).expect("triangle");
        let (generated, statistics) = scenario.run(scenario.input(triangle, &constructions, 2)).expect("run");
        let forms = generated
            .into_iter()
            .map(|g| (g.iteration(), g.canonical_form.as_str().to_string()))
            .collect::<Vec<_>>();
        (forms, statistics.emitted())
    };

    let first = forms(GenerationSettings::default());
    let second = forms(GenerationSettings::default());
    let sequential = forms(sequential());
    assert!(first.1 > 0);
    assert_eq!(first, second);
    assert_eq!(first, sequential);
}
