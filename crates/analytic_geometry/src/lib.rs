pub mod analytic;
pub mod catalog;
mod evaluators;
pub mod realization;

pub use analytic::{AnalyticObject, Circle, DEGENERACY_EPSILON, Line, Point, approx_eq};
pub use catalog::{ConstructionCatalog, Evaluation, EvaluationError, Evaluator};
pub use realization::{MAX_LAYOUT_ATTEMPTS, realize_layout};
