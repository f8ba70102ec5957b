use std::path::PathBuf;
use thiserror::Error;

/// Error type used by the seams between this crate and its collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum GlueError {
    #[error("failed to import module {module}")]
    Import {
        module: String,
        #[source]
        source: BoxError,
    },

    #[error("module {module} not found (vendored at {vendored:?} or on the search path)")]
    ModuleNotFound { module: String, vendored: PathBuf },

    #[error("cannot coerce '{value}' to {target}")]
    Coercion { value: String, target: &'static str },

    #[error("charger has no property store")]
    MissingStore,

    #[error("property name has to be defined")]
    MissingIdentifier,

    #[error("charger does not have property: {0}")]
    UnknownProperty(String),

    #[error("a value parameter is required for {0}")]
    MissingValue(String),

    #[error("runtime data missing for entry {0}")]
    MissingRuntimeData(String),

    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("unable to identify charger for device: {0}")]
    NoChargerForDevice(String),

    #[error("charger client failed: {0}")]
    Client(#[source] BoxError),

    #[error("could not publish event: {0}")]
    Event(#[source] BoxError),

    #[error("could not schedule property update: {0}")]
    Schedule(String),
}

pub type Result<T> = std::result::Result<T, GlueError>;
