use std::sync::Arc;
use serde_json::Value;
use crate::error::BoxError;
use crate::store::PropertyStore;

/// A live connection to one charger, implemented by the charger protocol library.
#[async_trait::async_trait]
pub trait ChargerClient: Send + Sync {
    fn name(&self) -> String;

    /// `None` if the client never built a property store.
    fn all_props(&self) -> Option<&PropertyStore>;

    fn connected(&self) -> bool;

    fn all_props_initialized(&self) -> bool;

    async fn connect(&self) -> Result<(), BoxError>;

    /// Asks the charger to change a property. The store reflects it once the charger confirms.
    async fn send_update(&self, identifier: &str, value: Value) -> Result<(), BoxError>;

    /// Older library versions have no public disconnect.
    fn has_disconnect(&self) -> bool {
        true
    }

    async fn disconnect(&self) -> Result<(), BoxError> {
        Err("disconnect is not supported by this client".into())
    }

    /// Raw transport access, only used when `has_disconnect` is false.
    fn legacy_transport(&self) -> Option<&dyn LegacyTransport> {
        None
    }
}

pub trait LegacyTransport: Send + Sync {
    fn close(&self) -> Result<(), BoxError>;

    fn clear_connected(&self);
}

/// Builds fresh charger clients: `(address, password, serial, cloud)`.
pub trait ChargerFactory: Send + Sync {
    fn create(
        &self,
        address: Option<&str>,
        password: Option<&str>,
        serial: Option<&str>,
        cloud: bool,
    ) -> Result<Arc<dyn ChargerClient>, BoxError>;
}
