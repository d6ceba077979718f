//! Background regeneration of the scored catalogue.

mod regenerator;
mod task;

pub use regenerator::{CatalogueRegenerator, RegenerationError, RegenerationProgress};
pub use task::{RegenerationState, RegenerationStatus, RegenerationTask};
