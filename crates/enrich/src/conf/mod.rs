//! Conf module — configuration model and loading.

pub mod model;
pub mod load;

pub use model::{EnrichConfig, ScanFieldConfig, SchemaConfig, TimeFieldConfig};
pub use load::DEFAULT_CONFIG_PATH;
