use core_types::{ConfigurationError, ConfigurationId, ObjectId};
use identity_store::IdentityError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalFormError {
    #[error("canonical forms of parent {0:?} are not cached")]
    ParentNotCached(ConfigurationId),
    #[error("object {0} is rendered before one of its arguments")]
    UnknownObject(ObjectId),
    #[error("permutation of size {actual} does not fit a layout with {expected} loose objects")]
    PermutationSize { expected: usize, actual: usize },
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
