use canonical_form::CanonicalFormError;
use consistency_oracle::OracleError;
use core_types::ConfigurationError;
use identity_store::IdentityError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    CanonicalForm(#[from] CanonicalFormError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
