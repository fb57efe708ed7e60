pub mod catalog;
pub mod paths;
pub mod reader;
pub mod types;
pub mod writer;

pub use catalog::{MaterialGroup, ProfileCatalog};
pub use paths::OrcaPaths;
pub use types::{FilamentProfile, NozzleSize};
