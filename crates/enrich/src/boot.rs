//! Boot — logging init, config load, registry and codec setup.

use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tcodec::{layout, CodecRegistry};

use crate::conf::EnrichConfig;
use crate::error::{BootError, ConfigError, RegistryErrors};
use crate::families;
use crate::pipeline::Enricher;
use crate::registry::{Registry, SharedRegistry};

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enrich=info,tcodec=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Register the built-in indicator families and freeze the registry.
pub fn build_registry() -> Result<SharedRegistry, RegistryErrors> {
    let mut builder = Registry::builder();
    families::register_all(&mut builder);
    let registry = builder.build().map_err(|e| {
        error!("Failed to build indicator registry: {}", e);
        e
    })?;
    Ok(Arc::new(registry))
}

/// Built-in codecs plus the named layouts and default selector of `config`.
pub fn build_codecs(config: &EnrichConfig) -> Result<CodecRegistry, ConfigError> {
    let mut codecs = CodecRegistry::new();
    for (name, fmt) in &config.codecs {
        codecs.register(name, layout(fmt)?)?;
    }
    codecs.set_default(&config.default_codec)?;
    Ok(codecs)
}

/// Assemble an [`Enricher`] from an already loaded config.
pub fn build(config: &EnrichConfig) -> Result<Enricher, BootError> {
    let registry = build_registry()?;
    info!(
        "Indicator registry ready: {} field(s), {} scanner(s)",
        registry.fields().count(),
        registry.scanner_names().count()
    );

    let codecs = build_codecs(config)?;
    info!("Time codecs ready: default={}", config.default_codec);

    Ok(Enricher::new(registry, &codecs, config)?)
}

/// Load config and build the shared enrichment state.
pub fn boot() -> Result<Enricher, BootError> {
    info!("Starting enrich v{}", env!("CARGO_PKG_VERSION"));

    let config = EnrichConfig::load()?;
    info!(
        "Loaded configuration: schemas={}, strict_timestamps={}",
        config.schemas.len(),
        config.strict_timestamps
    );

    build(&config)
}
