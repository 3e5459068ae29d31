mod error;
mod form;
mod relabel;
mod render;
mod resolver;
mod symmetry;

pub use error::CanonicalFormError;
pub use form::CanonicalForm;
pub use relabel::relabel_configuration;
pub use render::object_strings;
pub use resolver::{CanonicalFormResolver, ExtendedForm, FormEntry, canonical_form};
pub use symmetry::{is_symmetric_under, symmetric_permutations, symmetry_defect};
