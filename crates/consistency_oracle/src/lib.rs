mod cache;
mod error;
mod manager;
mod picture;
mod registrar;
mod settings;

pub use cache::OutcomeCache;
pub use error::OracleError;
pub use manager::{BatchVerdict, PicturesManager};
pub use picture::Picture;
pub use registrar::{Registrar, Registration, RegistrationOutcome};
pub use settings::{
    DEFAULT_MAXIMAL_REDRAW_ATTEMPTS, DEFAULT_NUMBER_OF_PICTURES, DEFAULT_SEED, DEFAULT_TOLERANCE,
    OracleSettings,
};
