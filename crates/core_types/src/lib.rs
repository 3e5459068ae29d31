pub mod arguments;
pub mod composed;
pub mod configuration;
pub mod construction;
pub mod error;
pub mod layout;
pub mod object;
pub mod signature;

pub use arguments::{Argument, Arguments};
pub use composed::{centroid, circumcenter, incenter, orthocenter, standard_composed_constructions};
pub use configuration::{Configuration, ConfigurationId};
pub use construction::{
    ComposedDefinition, ComposedStep, Construction, ConstructionBody, PredefinedConstructionType,
    construction_by_name, local,
};
pub use error::ConfigurationError;
pub use layout::{LooseObjectLayout, Permutation};
pub use object::{ConfigurationObject, ObjectId, ObjectKind, ObjectType};
pub use signature::{Parameter, Signature};
