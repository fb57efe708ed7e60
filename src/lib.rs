pub mod backup;
pub mod error;
pub mod orchestrator;
pub mod profile;
pub mod variant;

pub use backup::BackupSet;
pub use error::OrcaMateError;
pub use orchestrator::{run_conversion, ConversionReport, ConversionRequest};
pub use profile::{FilamentProfile, NozzleSize, OrcaPaths, ProfileCatalog};
