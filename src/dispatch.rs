use std::sync::Arc;
use log::{error, warn};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use crate::config::DebugProperties;
use crate::constants::{EVENT_PROPS, EVENT_PROPS_ID};
use crate::error::{GlueError, Result};
use crate::host::{ConfigEntry, Host, PropertyEvent};
use crate::store::{PropertyChange, PropertyStore};

/// Logs a property change if the debug filter lets it through.
pub async fn property_debug(identifier: &str, value: &Value, include: &DebugProperties) {
    if include.includes(identifier) {
        warn!("property_debug: watch_properties: {} => {}", identifier, value);
    }
}

/// Routes one property change: push to the registered entity, publish an event for
/// event-worthy properties, then hand it to the debug filter. Stops at the first failure.
pub async fn async_property_update(
    host: &dyn Host,
    entry: &ConfigEntry,
    identifier: &str,
    value: Value,
) {
    if let Err(err) = dispatch(host, entry, identifier, value) {
        error!(
            "{} - property_update: Could not dispatch {}: {}",
            entry.entry_id, identifier, err
        );
    }
}

fn dispatch(host: &dyn Host, entry: &ConfigEntry, identifier: &str, value: Value) -> Result<()> {
    let runtime_data = entry
        .runtime_data
        .as_ref()
        .ok_or_else(|| GlueError::MissingRuntimeData(entry.entry_id.clone()))?;

    if let Some(entity) = runtime_data.push_entities.get(identifier) {
        let entity = Arc::clone(entity);
        let value = value.clone();
        tokio::spawn(async move { entity.local_push(value).await });
    }

    if EVENT_PROPS.contains(&identifier) {
        let event = PropertyEvent {
            charger_id: runtime_data.params.charger_label(),
            entry_id: entry.entry_id.clone(),
            property: identifier.to_string(),
            value: value.clone(),
        };
        let data = serde_json::to_value(&event)
            .map_err(|err| GlueError::Event(Box::new(err)))?;
        host.fire_event(EVENT_PROPS_ID, data).map_err(GlueError::Event)?;
    }

    if runtime_data.debug_properties.is_enabled() {
        let include = runtime_data.debug_properties.clone();
        let identifier = identifier.to_string();
        tokio::spawn(async move { property_debug(&identifier, &value, &include).await });
    }

    Ok(())
}

/// Entry point for the charger client's change hook, callable from any thread.
/// Changes are queued to a task on the runtime and dispatched in order; the caller never waits.
/// The queue is unbounded so a full status sync from the charger is never cut short.
#[derive(Clone)]
pub struct PropertyUpdateHandler {
    entry_id: String,
    sender: mpsc::UnboundedSender<PropertyChange>,
}

impl PropertyUpdateHandler {
    pub fn spawn(runtime: &Handle, host: Arc<dyn Host>, entry: Arc<ConfigEntry>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<PropertyChange>();
        let entry_id = entry.entry_id.clone();
        runtime.spawn(async move {
            while let Some(PropertyChange { identifier, value }) = receiver.recv().await {
                async_property_update(host.as_ref(), &entry, &identifier, value).await;
            }
        });
        Self { entry_id, sender }
    }

    pub fn handle(&self, identifier: &str, value: Value) {
        let change = PropertyChange {
            identifier: identifier.to_string(),
            value,
        };
        // Only fails once the dispatch task is gone.
        if let Err(err) = self
            .sender
            .send(change)
            .map_err(|err| GlueError::Schedule(err.to_string()))
        {
            error!(
                "{} - PropertyUpdateHandler: Could not execute async: {}",
                self.entry_id, err
            );
        }
    }
}

/// Feeds every change reported by `store` into `handler` until the store is dropped.
pub fn watch_property_store(
    store: &PropertyStore,
    handler: PropertyUpdateHandler,
) -> JoinHandle<()> {
    let mut recv = store.subscribe();
    tokio::spawn(async move {
        while let Some(PropertyChange { identifier, value }) = recv.recv().await {
            handler.handle(&identifier, value);
        }
    })
}
