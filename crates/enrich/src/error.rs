use std::fmt;

use thiserror::Error;

use crate::field::FieldId;

/// A single registration problem found while building the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Field {id} already registered as {existing:?}")]
    DuplicateField { id: FieldId, existing: String },

    #[error("Field {id} has incomplete metadata: missing {missing}")]
    IncompleteField { id: FieldId, missing: &'static str },

    #[error("Scanner already registered: {0}")]
    DuplicateScanner(String),

    #[error("Scanner name must not be empty")]
    EmptyScannerName,

    #[error("Scanner {scanner} declares no output fields")]
    NoOutputFields { scanner: String },

    #[error("Scanner {scanner} declares unregistered field {field}")]
    UnknownOutputField { scanner: String, field: FieldId },

    #[error("Scanner {scanner} copies into undeclared field {field}")]
    UndeclaredPassthrough { scanner: String, field: FieldId },
}

/// Every registration problem found by one builder.
///
/// Returned by `RegistryBuilder::build`; a registry with any of these is never handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryErrors(pub Vec<RegistryError>);

impl RegistryErrors {
    pub fn errors(&self) -> &[RegistryError] {
        &self.0
    }
}

impl fmt::Display for RegistryErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} registry error(s)", self.0.len())?;
        for err in &self.0 {
            write!(f, "; {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for RegistryErrors {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("Unknown scanner: {0}")]
    UnknownScanner(String),

    #[error("Unknown field: {0}")]
    UnknownField(FieldId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Schema {log_type}: unknown scanner {scanner:?} for {path}")]
    UnknownScanner {
        log_type: String,
        path: String,
        scanner: String,
    },

    #[error("Schema {log_type}: bad codec for {path}: {source}")]
    Codec {
        log_type: String,
        path: String,
        #[source]
        source: tcodec::CodecError,
    },

    #[error("Codec error: {0}")]
    Registry(#[from] tcodec::CodecError),
}

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("Unknown log type: {0}")]
    UnknownLogType(String),

    #[error("Record is not a JSON object")]
    NotAnObject,

    #[error("Field {path}: {source}")]
    Timestamp {
        path: String,
        #[source]
        source: tcodec::DecodeError,
    },

    #[error(transparent)]
    Scan(#[from] ScanError),
}

#[derive(Debug, Error)]
pub enum BootError {
    #[error(transparent)]
    Registry(#[from] RegistryErrors),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// Convenience type alias
pub type EnrichResult<T> = Result<T, EnrichError>;
