use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use core_types::{Construction, ConstructionBody, PredefinedConstructionType};
use thiserror::Error;

use crate::analytic::AnalyticObject;
use crate::evaluators;

/// Computes the outputs of a construction from its flattened inputs.
/// `None` means the inputs are in a position where the construction is undefined.
pub type Evaluator = Arc<dyn Fn(&[AnalyticObject]) -> Option<Vec<AnalyticObject>> + Send + Sync>;

#[derive(Clone, Debug, PartialEq)]
pub enum Evaluation {
    Constructed(Vec<AnalyticObject>),
    Degenerate,
}

impl Evaluation {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate)
    }

    pub fn into_objects(self) -> Option<Vec<AnalyticObject>> {
        match self {
            Self::Constructed(objects) => Some(objects),
            Self::Degenerate => None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("no evaluator registered for {0}")]
    MissingEvaluator(String),
    #[error("{construction} expects {expected} inputs, got {actual}")]
    InputCount {
        construction: String,
        expected: usize,
        actual: usize,
    },
    #[error("{construction} returned {actual} objects where {expected} were declared")]
    OutputMismatch {
        construction: String,
        expected: String,
        actual: String,
    },
    #[error("composed construction {construction} references undefined local {index}")]
    MalformedComposition { construction: String, index: usize },
}

/// Maps predefined construction kinds to their numeric evaluators.
#[derive(Clone)]
pub struct ConstructionCatalog {
    evaluators: HashMap<PredefinedConstructionType, Evaluator>,
}

impl fmt::Debug for ConstructionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds = self.evaluators.keys().collect::<Vec<_>>();
        kinds.sort();
        f.debug_struct("ConstructionCatalog")
            .field("evaluators", &kinds)
            .finish()
    }
}

impl Default for ConstructionCatalog {
    fn default() -> Self {
        Self::with_predefined()
    }
}

impl ConstructionCatalog {
    pub fn empty() -> Self {
        Self {
            evaluators: HashMap::new(),
        }
    }

    pub fn with_predefined() -> Self {
        use PredefinedConstructionType::*;
        let mut catalog = Self::empty();
        catalog.register(Midpoint, evaluators::midpoint);
        catalog.register(LineFromPoints, evaluators::line_from_points);
        catalog.register(IntersectionOfLines, evaluators::intersection_of_lines);
        catalog.register(
            IntersectionOfLinesFromPoints,
            evaluators::intersection_of_lines_from_points,
        );
        catalog.register(PerpendicularBisector, evaluators::perpendicular_bisector);
        catalog.register(PerpendicularLine, evaluators::perpendicular_line);
        catalog.register(ParallelLine, evaluators::parallel_line);
        catalog.register(PerpendicularProjection, evaluators::perpendicular_projection);
        catalog.register(PerpendicularDrop, evaluators::perpendicular_drop);
        catalog.register(PointReflection, evaluators::point_reflection);
        catalog.register(ReflectionInLine, evaluators::reflection_in_line);
        catalog.register(Circumcircle, evaluators::circumcircle);
        catalog.register(
            CircleWithCenterThroughPoint,
            evaluators::circle_with_center_through_point,
        );
        catalog.register(CenterOfCircle, evaluators::center_of_circle);
        catalog.register(InternalAngleBisector, evaluators::internal_angle_bisector);
        catalog.register(
            SecondIntersectionOfCircleAndLineFromPoints,
            evaluators::second_intersection_of_circle_and_line_from_points,
        );
        catalog.register(
            SecondIntersectionOfTwoCircumcircles,
            evaluators::second_intersection_of_two_circumcircles,
        );
        catalog
    }

    /// Installs or replaces the evaluator of `kind`.
    pub fn register<F>(&mut self, kind: PredefinedConstructionType, evaluator: F)
    where
        F: Fn(&[AnalyticObject]) -> Option<Vec<AnalyticObject>> + Send + Sync + 'static,
    {
        self.evaluators.insert(kind, Arc::new(evaluator));
    }

    pub fn contains(&self, kind: PredefinedConstructionType) -> bool {
        self.evaluators.contains_key(&kind)
    }

    /// Whether every predefined construction reachable from `construction` has an evaluator.
    pub fn supports(&self, construction: &Construction) -> bool {
        match construction.body() {
            ConstructionBody::Predefined(kind) => self.contains(*kind),
            ConstructionBody::Composed(definition) => definition
                .steps
                .iter()
                .all(|step| self.supports(&step.construction)),
        }
    }

    /// Evaluates `construction` on inputs given in flattened argument order.
    pub fn evaluate(
        &self,
        construction: &Construction,
        inputs: &[AnalyticObject],
    ) -> Result<Evaluation, EvaluationError> {
        let expected = construction.signature().leaf_types().len();
        if inputs.len() != expected {
            return Err(EvaluationError::InputCount {
                construction: construction.name().to_string(),
                expected,
                actual: inputs.len(),
            });
        }

        let outputs = match construction.body() {
            ConstructionBody::Predefined(kind) => {
                let evaluator = self
                    .evaluators
                    .get(kind)
                    .ok_or_else(|| EvaluationError::MissingEvaluator(kind.name().to_string()))?;
                match evaluator(inputs) {
                    Some(outputs) => outputs,
                    None => return Ok(Evaluation::Degenerate),
                }
            }
            ConstructionBody::Composed(definition) => {
                let mut locals = inputs.to_vec();
                for step in &definition.steps {
                    let mut step_inputs = Vec::new();
                    for id in step.arguments.flatten() {
                        let index = id.as_u64() as usize;
                        let value = locals.get(index).copied().ok_or_else(|| {
                            EvaluationError::MalformedComposition {
                                construction: construction.name().to_string(),
                                index,
                            }
                        })?;
                        step_inputs.push(value);
                    }
                    match self.evaluate(&step.construction, &step_inputs)? {
                        Evaluation::Constructed(objects) => locals.extend(objects),
                        Evaluation::Degenerate => return Ok(Evaluation::Degenerate),
                    }
                }
                let mut results = Vec::with_capacity(definition.results.len());
                for &index in &definition.results {
                    let value = locals.get(index).copied().ok_or_else(|| {
                        EvaluationError::MalformedComposition {
                            construction: construction.name().to_string(),
                            index,
                        }
                    })?;
                    results.push(value);
                }
                results
            }
        };

        if !outputs.iter().all(AnalyticObject::is_finite) {
            return Ok(Evaluation::Degenerate);
        }
        let declared = construction.outputs();
        let produced = outputs.iter().map(AnalyticObject::object_type).collect::<Vec<_>>();
        if produced != declared {
            return Err(EvaluationError::OutputMismatch {
                construction: construction.name().to_string(),
                expected: format!("{declared:?}"),
                actual: format!("{produced:?}"),
            });
        }
        Ok(Evaluation::Constructed(outputs))
    }
}
