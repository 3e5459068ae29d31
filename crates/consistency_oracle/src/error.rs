use analytic_geometry::EvaluationError;
use core_types::{LooseObjectLayout, ObjectId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OracleError {
    #[error("invalid oracle settings: {0}")]
    InvalidSettings(String),
    #[error("no well-shaped realization of layout {0:?} was found")]
    LayoutUnrealizable(LooseObjectLayout),
    #[error("pictures stayed inconsistent for objects {objects:?} after {attempts} redraws")]
    Inconsistent {
        objects: Vec<ObjectId>,
        attempts: usize,
    },
    #[error("object {0} has no value in the pictures")]
    MissingValue(ObjectId),
    #[error("batch is malformed: {0}")]
    MalformedBatch(String),
    #[error("initial configuration is not valid: {0}")]
    InitialConfiguration(String),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
