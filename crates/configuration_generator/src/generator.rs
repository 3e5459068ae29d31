use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use analytic_geometry::ConstructionCatalog;
use argument_generator::{ObjectPool, generate_arguments};
use canonical_form::{CanonicalForm, CanonicalFormResolver, FormEntry};
use consistency_oracle::{OracleError, OutcomeCache, PicturesManager, Registrar, RegistrationOutcome};
use core_types::{Arguments, Configuration, ConfigurationId, ConfigurationObject, Construction};
use identity_store::IdentityStore;
use rayon::prelude::*;
use tracing::{Span, debug, info, info_span};

use crate::error::GeneratorError;
use crate::filter::{ConfigurationFilter, SymmetryFilter};
use crate::input::GeneratorInput;
use crate::registry::LayerRegistry;
use crate::settings::GenerationSettings;
use crate::statistics::{GenerationStatistics, Rejection, StatisticsHandle};

/// One accepted configuration, in the order the run produced it.
#[derive(Clone, Debug)]
pub struct GeneratedConfiguration {
    pub configuration: Arc<Configuration>,
    pub canonical_form: CanonicalForm,
}

impl GeneratedConfiguration {
    pub fn iteration(&self) -> usize {
        self.configuration.iteration()
    }

    pub fn parent(&self) -> Option<ConfigurationId> {
        self.configuration.parent().map(|parent| parent.id())
    }
}

/// Layered search over construction applications.
///
/// The identity store is shared with the caller so objects of the initial
/// configuration and of generated configurations live in one identity space.
#[derive(Debug)]
pub struct ConfigurationGenerator {
    store: Arc<IdentityStore>,
    catalog: Arc<ConstructionCatalog>,
    settings: GenerationSettings,
}

impl ConfigurationGenerator {
    pub fn new(store: Arc<IdentityStore>, catalog: Arc<ConstructionCatalog>, settings: GenerationSettings) -> Self {
        Self {
            store,
            catalog,
            settings,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Starts a run that emits every configuration allowed by `input.symmetry`.
    pub fn generate(&self, input: GeneratorInput) -> Result<GenerationRun, GeneratorError> {
        let filter = Arc::new(SymmetryFilter::new(input.symmetry, input.max_outputs()));
        self.generate_filtered(input, filter)
    }

    /// Starts a run with a caller-supplied filter. Fails when the settings or the
    /// input are invalid, or when the initial configuration does not register cleanly.
    pub fn generate_filtered(
        &self,
        input: GeneratorInput,
        filter: Arc<dyn ConfigurationFilter>,
    ) -> Result<GenerationRun, GeneratorError> {
        self.settings.validate()?;
        input.validate(&self.catalog)?;

        let root = Arc::clone(&input.initial_configuration);
        let layout = root.layout();
        let resolver = if self.settings.isomorph_rejection {
            CanonicalFormResolver::new(layout)
        } else {
            CanonicalFormResolver::identity_only(layout)
        };
        let root_form = resolver.resolve_root(&root)?;

        let registrar = Registrar::new(&self.settings.oracle, Arc::new(OutcomeCache::new()));
        let mut manager = PicturesManager::new(
            layout,
            root.loose_objects().to_vec(),
            Arc::clone(&self.catalog),
            &self.settings.oracle,
        )?;
        let initial_redraws = registrar.register_configuration(&mut manager, &root)?;
        info!(
            layout = layout.name(),
            objects = root.constructed_objects().len(),
            form = %root_form,
            initial_redraws,
            "initial configuration registered"
        );

        let statistics = StatisticsHandle::default();
        statistics.update(|statistics| statistics.initial_redraws = initial_redraws);

        let mut current = VecDeque::new();
        current.push_back(Node {
            configuration: Arc::clone(&root),
            manager,
        });
        let finished = input.number_of_iterations == 0;
        Ok(GenerationRun {
            engine: Engine {
                store: Arc::clone(&self.store),
                resolver,
                registrar,
                filter,
                parallel: self.settings.parallel,
                chunk_size: self.settings.chunk_size,
            },
            next_id: root.id().as_u64() + 1,
            input,
            current,
            next: Vec::new(),
            pending: VecDeque::new(),
            registry: LayerRegistry::new(),
            iteration: 1,
            span: info_span!("layer", iteration = 1),
            statistics,
            finished,
        })
    }
}

/// An accepted configuration together with the pictures it was validated in.
#[derive(Debug)]
struct Node {
    configuration: Arc<Configuration>,
    manager: PicturesManager,
}

/// State shared by the workers of one run.
struct Engine {
    store: Arc<IdentityStore>,
    resolver: CanonicalFormResolver,
    registrar: Registrar,
    filter: Arc<dyn ConfigurationFilter>,
    parallel: bool,
    chunk_size: usize,
}

struct Candidate {
    construction: Arc<Construction>,
    objects: Vec<Arc<ConfigurationObject>>,
    form: CanonicalForm,
    entry: FormEntry,
}

enum Verdict {
    Valid(Candidate, PicturesManager),
    Rejected(Rejection),
}

impl Engine {
    fn map<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        if self.parallel {
            items.into_par_iter().map(f).collect()
        } else {
            items.into_iter().map(f).collect()
        }
    }

    /// Resolves the objects of one construction application and its canonical form.
    fn prepare(
        &self,
        parent: &Configuration,
        construction: Arc<Construction>,
        arguments: &Arguments,
    ) -> Result<Result<Candidate, Rejection>, GeneratorError> {
        let objects = self.store.construct(&construction, arguments)?;
        if objects.iter().any(|object| parent.contains(object.id())) {
            return Ok(Err(Rejection::AlreadyPresent));
        }
        if self.registrar.cache().is_unconstructible(&objects) {
            return Ok(Err(Rejection::CachedUnconstructible));
        }
        let extended = self.resolver.extend(parent.id(), &objects)?;
        Ok(Ok(Candidate {
            construction,
            objects,
            form: extended.form,
            entry: extended.entry,
        }))
    }

    /// Runs the candidate through the pictures of its parent.
    fn validate(&self, manager: &PicturesManager, candidate: Candidate) -> Result<(Verdict, usize), GeneratorError> {
        let mut manager = manager.clone();
        match self.registrar.register(&mut manager, &candidate.objects) {
            Ok(registration) => {
                let verdict = match registration.outcome {
                    RegistrationOutcome::Constructible => Verdict::Valid(candidate, manager),
                    RegistrationOutcome::Duplicate(pairs) => {
                        debug!(construction = candidate.construction.name(), ?pairs, "geometric duplicate");
                        Verdict::Rejected(Rejection::GeometricDuplicate)
                    }
                    RegistrationOutcome::Unconstructible => {
                        debug!(construction = candidate.construction.name(), "unconstructible");
                        Verdict::Rejected(Rejection::Unconstructible)
                    }
                };
                Ok((verdict, registration.redraws))
            }
            Err(OracleError::Inconsistent { objects, attempts }) => {
                debug!(?objects, attempts, "rejecting inconsistent candidate");
                Ok((Verdict::Rejected(Rejection::Inconsistent), attempts))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Lazy stream of accepted configurations. Layers are produced one parent at a
/// time; a layer is only started once the previous one is fully processed.
///
/// After the first error the run yields that error once and then stops.
pub struct GenerationRun {
    engine: Engine,
    input: GeneratorInput,
    current: VecDeque<Node>,
    next: Vec<Node>,
    pending: VecDeque<GeneratedConfiguration>,
    registry: LayerRegistry,
    next_id: u64,
    iteration: usize,
    span: Span,
    statistics: StatisticsHandle,
    finished: bool,
}

impl GenerationRun {
    /// Iteration of the layer being produced.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn statistics(&self) -> GenerationStatistics {
        self.statistics.snapshot()
    }

    pub fn statistics_handle(&self) -> StatisticsHandle {
        self.statistics.clone()
    }

    fn step(&mut self) -> Result<(), GeneratorError> {
        let Some(node) = self.current.pop_front() else {
            return self.advance_layer();
        };
        let span = self.span.clone();
        let _entered = span.enter();
        self.expand(node)?;
        if self.current.is_empty() {
            let layer = self
                .statistics
                .update(|statistics| statistics.layer_mut(self.iteration).clone());
            info!(
                candidates = layer.candidates,
                emitted = layer.emitted,
                filtered_out = layer.filtered_out,
                rejected = layer.rejected(),
                extended = layer.extended,
                redraws = layer.redraws,
                "layer complete"
            );
        }
        Ok(())
    }

    fn advance_layer(&mut self) -> Result<(), GeneratorError> {
        if self.next.is_empty() || self.iteration >= self.input.number_of_iterations {
            self.finished = true;
            return Ok(());
        }
        self.iteration += 1;
        self.current = std::mem::take(&mut self.next).into();
        self.registry = LayerRegistry::new();
        self.span = info_span!("layer", iteration = self.iteration);
        Ok(())
    }

    /// Applies every construction to `node` and queues what survives. Applications
    /// are pulled from the argument streams `chunk_size` at a time.
    ///
    /// The first candidate of a canonical form claims it for the layer. Isomorphs
    /// from the same chunk wait on the claim: an inconsistent claimant hands it to
    /// the next one, any other verdict settles the whole class.
    fn expand(&mut self, node: Node) -> Result<(), GeneratorError> {
        let parent = Arc::clone(&node.configuration);
        let counts = parent.constructed_count_by_type();
        let pool = ObjectPool::from_configuration(&parent);
        let iteration = self.iteration;
        let remaining = self.input.number_of_iterations - iteration;

        let input = &self.input;
        let mut applications = input
            .constructions
            .iter()
            .filter(|construction| input.within_caps(&counts, construction))
            .flat_map(|construction| {
                generate_arguments(&pool, construction.signature())
                    .map(move |arguments| (Arc::clone(construction), arguments))
            });

        let engine = &self.engine;
        let mut candidates = 0;
        let mut rejections = Vec::new();
        let mut redraws = 0;
        let mut emitted = 0;
        let mut filtered_out = 0;
        let mut extended = 0;
        loop {
            let chunk = applications.by_ref().take(engine.chunk_size).collect::<Vec<_>>();
            if chunk.is_empty() {
                break;
            }
            candidates += chunk.len();
            let prepared = engine
                .map(chunk, |(construction, arguments)| {
                    engine.prepare(&parent, construction, &arguments)
                })
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?;

            let mut round = Vec::new();
            let mut waiting: BTreeMap<[u8; 32], VecDeque<Candidate>> = BTreeMap::new();
            for candidate in prepared {
                match candidate {
                    Ok(candidate) if self.registry.insert(&candidate.form) => {
                        waiting.insert(candidate.form.digest(), VecDeque::new());
                        round.push(candidate);
                    }
                    Ok(candidate) => match waiting.get_mut(&candidate.form.digest()) {
                        Some(queue) => queue.push_back(candidate),
                        None => {
                            debug!(form = %candidate.form, "isomorphic duplicate");
                            rejections.push(Rejection::IsomorphicDuplicate);
                        }
                    },
                    Err(rejection) => rejections.push(rejection),
                }
            }

            while !round.is_empty() {
                let digests = round.iter().map(|candidate| candidate.form.digest()).collect::<Vec<_>>();
                let manager = &node.manager;
                let validated = engine
                    .map(round, |candidate| engine.validate(manager, candidate))
                    .into_iter()
                    .collect::<Result<Vec<_>, _>>()?;

                let mut retry = Vec::new();
                for (digest, (verdict, spent)) in digests.into_iter().zip(validated) {
                    redraws += spent;
                    let (candidate, manager) = match verdict {
                        Verdict::Valid(candidate, manager) => (candidate, manager),
                        Verdict::Rejected(Rejection::Inconsistent) => {
                            rejections.push(Rejection::Inconsistent);
                            match waiting.get_mut(&digest).and_then(VecDeque::pop_front) {
                                Some(isomorph) => retry.push(isomorph),
                                None => {
                                    self.registry.release(&digest);
                                }
                            }
                            continue;
                        }
                        Verdict::Rejected(rejection) => {
                            rejections.push(rejection);
                            continue;
                        }
                    };
                    let id = ConfigurationId::from_u64(self.next_id);
                    self.next_id += 1;
                    let configuration = Arc::new(Configuration::derive(&parent, id, candidate.objects)?);

                    if engine.filter.accept(&configuration)? {
                        emitted += 1;
                        self.pending.push_back(GeneratedConfiguration {
                            configuration: Arc::clone(&configuration),
                            canonical_form: candidate.form,
                        });
                    } else {
                        filtered_out += 1;
                    }
                    if remaining > 0 && engine.filter.keep_extending(&configuration, remaining)? {
                        engine.resolver.commit(id, candidate.entry);
                        self.next.push(Node { configuration, manager });
                        extended += 1;
                    }
                }
                round = retry;
            }

            for candidate in waiting.into_values().flatten() {
                debug!(form = %candidate.form, "isomorphic duplicate");
                rejections.push(Rejection::IsomorphicDuplicate);
            }
        }
        engine.resolver.forget(parent.id());

        self.statistics.update(|statistics| {
            let layer = statistics.layer_mut(iteration);
            layer.candidates += candidates;
            for rejection in &rejections {
                layer.reject(*rejection);
            }
            layer.redraws += redraws;
            layer.emitted += emitted;
            layer.filtered_out += filtered_out;
            layer.extended += extended;
        });
        debug!(
            parent = ?parent.id(),
            candidates,
            rejected = rejections.len(),
            emitted,
            filtered_out,
            "configuration expanded"
        );
        Ok(())
    }
}

impl Iterator for GenerationRun {
    type Item = Result<GeneratedConfiguration, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(generated) = self.pending.pop_front() {
                return Some(Ok(generated));
            }
            if self.finished {
                return None;
            }
            if let Err(err) = self.step() {
                self.finished = true;
                return Some(Err(err));
            }
        }
    }
}
