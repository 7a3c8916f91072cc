// Indicator extraction and timestamp normalization for log records.

// Core infrastructure
pub mod field;
pub mod writer;
pub mod scanner;
pub mod registry;
pub mod indicators;
pub mod row;
pub mod error;

// Domain modules
pub mod families;
pub mod schema;
pub mod pipeline;
pub mod conf;
pub mod boot;

pub use field::{FieldId, FieldMeta};
pub use writer::{IndicatorRow, RowWriter, ValueWriter};
pub use scanner::{scan_all, Scanner, ValueScanner};
pub use registry::{Registry, RegistryBuilder, SharedRegistry};
pub use indicators::{IndicatorSet, Indicators};
pub use row::LogRow;
pub use error::{BootError, ConfigError, EnrichError, EnrichResult, RegistryError, RegistryErrors, ScanError};
pub use schema::Schema;
pub use pipeline::Enricher;
pub use conf::EnrichConfig;
