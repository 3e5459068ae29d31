use thiserror::Error;

use crate::object::ObjectId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{construction} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        construction: String,
        expected: usize,
        actual: usize,
    },
    #[error("argument {argument} does not match parameter {parameter} of {construction}")]
    ParameterMismatch {
        construction: String,
        parameter: String,
        argument: String,
    },
    #[error("object {0} is not known")]
    UnknownObject(ObjectId),
    #[error("object {object} depends on {argument}, which does not appear earlier in the configuration")]
    UnknownArgument { object: ObjectId, argument: ObjectId },
    #[error("object {0} is already part of the configuration")]
    DuplicateObject(ObjectId),
    #[error("loose object {0} cannot be appended to a derived configuration")]
    LooseObjectAppended(ObjectId),
    #[error("layout {layout} expects loose objects {expected}, got {actual}")]
    LayoutMismatch {
        layout: String,
        expected: String,
        actual: String,
    },
    #[error("{construction} has no output {output}")]
    OutputOutOfRange { construction: String, output: usize },
    #[error("composed construction {construction} is malformed: {reason}")]
    MalformedComposition { construction: String, reason: String },
}
