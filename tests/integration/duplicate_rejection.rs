use configuration_generator::GenerationSettings;
use core_types::{Argument, Arguments, Construction, LooseObjectLayout, PredefinedConstructionType};
use integration_tests::Scenario;

#[test]
fn reflection_through_the_midpoint_is_not_a_new_configuration() {
    let scenario = Scenario::new(GenerationSettings::default());
    let mut builder = scenario.builder(LooseObjectLayout::LineSegment);
    let a = builder.object_id("A").expect("A");
    let b = builder.object_id("B").expect("B");
    let m = builder
        .add(
            "M",
            &Construction::predefined(PredefinedConstructionType::Midpoint),
            Arguments::new(vec![Argument::Set(vec![Argument::Object(a), Argument::Object(b)])]),
        )
        .expect("midpoint")[0];
    let segment = std::sync::Arc::new(builder.build(core_types::ConfigurationId::from_u64(0)).expect("segment"));

    let input = scenario.input(segment, &[PredefinedConstructionType::PointReflection], 1);
    let (generated, statistics) = scenario.run(input).expect("run");

    let reflection = Construction::predefined(PredefinedConstructionType::PointReflection);
    let onto_b = scenario
        .store
        .construct(&reflection, &Arguments::new(vec![Argument::Object(a), Argument::Object(m)]))
        .expect("reflection")[0]
        .id();
    let onto_a = scenario
        .store
        .construct(&reflection, &Arguments::new(vec![Argument::Object(b), Argument::Object(m)]))
        .expect("reflection")[0]
        .id();
    for g in &generated {
        assert!(!g.configuration.contains(onto_b));
        assert!(!g.configuration.contains(onto_a));
    }

    let layer = statistics.layer(1).expect("layer 1");
    assert_eq!(layer.candidates, 6);
    assert_eq!(layer.geometric_duplicates, 1);
    assert_eq!(layer.isomorphic_duplicates, 3);
    assert_eq!(layer.emitted, 2);
}

#[test]
fn coinciding_lines_are_duplicates_of_the_existing_line() {
    let scenario = Scenario::new(GenerationSettings {
        isomorph_rejection: false,
        ..GenerationSettings::default()
    });
    let mut builder = scenario.builder(LooseObjectLayout::LineSegment);
    let a = builder.object_id("A").expect("A");
    let b = builder.object_id("B").expect("B");
    let pair = Arguments::new(vec![Argument::Set(vec![Argument::Object(a), Argument::Object(b)])]);
    builder
        .add("M", &Construction::predefined(PredefinedConstructionType::Midpoint), pair.clone())
        .expect("midpoint");
    builder
        .add("ab", &Construction::predefined(PredefinedConstructionType::LineFromPoints), pair)
        .expect("line");
    let segment = std::sync::Arc::new(builder.build(core_types::ConfigurationId::from_u64(0)).expect("segment"));

    let input = scenario.input(segment, &[PredefinedConstructionType::LineFromPoints], 1);
    let (generated, statistics) = scenario.run(input).expect("run");

    // Every line through two of A, B, M is the line AB.
    assert!(generated.is_empty());
    let layer = statistics.layer(1).expect("layer 1");
    assert_eq!(layer.already_present, 1);
    assert_eq!(layer.geometric_duplicates, 2);
}
