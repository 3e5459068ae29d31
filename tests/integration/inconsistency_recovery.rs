use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use analytic_geometry::{AnalyticObject, ConstructionCatalog};
use configuration_generator::GeneratorError;
use consistency_oracle::{DEFAULT_MAXIMAL_REDRAW_ATTEMPTS, DEFAULT_NUMBER_OF_PICTURES, OracleError};
use core_types::{Argument, Arguments, Construction, ConfigurationId, LooseObjectLayout, PredefinedConstructionType};
use integration_tests::{Scenario, sequential};

fn midpoint(inputs: &[AnalyticObject]) -> Option<Vec<AnalyticObject>> {
    let a = inputs[0].as_point()?;
    let b = inputs[1].as_point()?;
    Some(vec![AnalyticObject::Point(a.add(b).scale(0.5))])
}

/// Catalog whose midpoint degenerates on the calls for which `degenerate` holds.
fn flaky_catalog(degenerate: impl Fn(usize) -> bool + Send + Sync + 'static) -> (ConstructionCatalog, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut catalog = ConstructionCatalog::with_predefined();
    catalog.register(PredefinedConstructionType::Midpoint, move |inputs| {
        if degenerate(counter.fetch_add(1, Ordering::SeqCst)) {
            None
        } else {
            midpoint(inputs)
        }
    });
    (catalog, calls)
}

#[test]
fn one_disagreeing_picture_costs_exactly_one_redraw() {
    let (catalog, _) = flaky_catalog(|call| call == 0);
    let mut settings = sequential();
    settings.isomorph_rejection = false;
    let scenario = Scenario::with_catalog(settings, catalog);
    let triangle = scenario.bare(LooseObjectLayout::Triangle).expect("triangle");
    let input = scenario.input(triangle, &[PredefinedConstructionType::Midpoint], 1);
    let (generated, statistics) = scenario.run(input).expect("run");

    assert_eq!(generated.len(), 3);
    let layer = statistics.layer(1).expect("layer 1");
    assert_eq!(layer.redraws, 1);
    assert_eq!(layer.inconsistent, 0);
    assert_eq!(statistics.redraws(), 1);
}

#[test]
fn persistent_disagreement_rejects_candidates_without_failing_the_run() {
    // The first picture of every evaluation degenerates, the others never do.
    let (catalog, _) = flaky_catalog(|call| call % DEFAULT_NUMBER_OF_PICTURES == 0);
    let mut settings = sequential();
    settings.isomorph_rejection = false;
    let scenario = Scenario::with_catalog(settings, catalog);
    let triangle = scenario.bare(LooseObjectLayout::Triangle).expect("triangle");
    let input = scenario.input(triangle, &[PredefinedConstructionType::Midpoint], 1);
    let (generated, statistics) = scenario.run(input).expect("run");

    assert!(generated.is_empty());
    let layer = statistics.layer(1).expect("layer 1");
    assert_eq!(layer.inconsistent, 3);
    assert_eq!(layer.redraws, 3 * DEFAULT_MAXIMAL_REDRAW_ATTEMPTS);
}

#[test]
fn an_inconsistent_candidate_hands_its_form_to_a_waiting_isomorph() {
    // Every evaluation of the first candidate disagrees in one picture; later calls are clean.
    let first_candidate_calls = DEFAULT_NUMBER_OF_PICTURES * (DEFAULT_MAXIMAL_REDRAW_ATTEMPTS + 1);
    let (catalog, _) =
        flaky_catalog(move |call| call < first_candidate_calls && call % DEFAULT_NUMBER_OF_PICTURES == 0);
    let scenario = Scenario::with_catalog(sequential(), catalog);
    let triangle = scenario.bare(LooseObjectLayout::Triangle).expect("triangle");
    let input = scenario.input(triangle, &[PredefinedConstructionType::Midpoint], 1);
    let (generated, statistics) = scenario.run(input).expect("run");

    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].canonical_form.as_str(), "Midpoint({A,B})");
    let layer = statistics.layer(1).expect("layer 1");
    assert_eq!(layer.candidates, 3);
    assert_eq!(layer.inconsistent, 1);
    assert_eq!(layer.isomorphic_duplicates, 1);
    assert_eq!(layer.emitted, 1);
    assert_eq!(layer.redraws, DEFAULT_MAXIMAL_REDRAW_ATTEMPTS);
}

#[test]
fn persistent_disagreement_in_the_initial_configuration_is_fatal() {
    let (catalog, calls) = flaky_catalog(|call| call % DEFAULT_NUMBER_OF_PICTURES == 0);
    let scenario = Scenario::with_catalog(sequential(), catalog);
    let mut builder = scenario.builder(LooseObjectLayout::Triangle);
    let a = builder.object_id("A").expect("A");
    let b = builder.object_id("B").expect("B");
    builder
        .add(
            "M",
            &Construction::predefined(PredefinedConstructionType::Midpoint),
            Arguments::new(vec![Argument::Set(vec![Argument::Object(a), Argument::Object(b)])]),
        )
        .expect("midpoint");
    let initial = Arc::new(builder.build(ConfigurationId::from_u64(0)).expect("triangle"));

    let input = scenario.input(initial, &[PredefinedConstructionType::Midpoint], 1);
    let err = scenario.run(input).expect_err("initial configuration never settles");
    assert!(matches!(err, GeneratorError::Oracle(OracleError::InitialConfiguration(_))));
    assert_eq!(
        calls.load(Ordering::SeqCst),
        DEFAULT_NUMBER_OF_PICTURES * (DEFAULT_MAXIMAL_REDRAW_ATTEMPTS + 1)
    );
}
