use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use crate::client::ChargerClient;
use crate::config::{ConnectionParams, DebugProperties};
use crate::error::BoxError;

/// A host entity that accepts values pushed by the charger.
#[async_trait::async_trait]
pub trait PushEntity: Send + Sync {
    async fn local_push(&self, value: Value);
}

/// Everything kept alive for one configured charger.
pub struct RuntimeData {
    pub charger: Arc<dyn ChargerClient>,
    pub push_entities: HashMap<String, Arc<dyn PushEntity>>,
    pub params: ConnectionParams,
    pub debug_properties: DebugProperties,
}

impl RuntimeData {
    pub fn new(charger: Arc<dyn ChargerClient>, params: ConnectionParams) -> Self {
        Self {
            charger,
            push_entities: HashMap::new(),
            params,
            debug_properties: DebugProperties::default(),
        }
    }
}

pub struct ConfigEntry {
    pub entry_id: String,
    pub domain: String,
    pub runtime_data: Option<Arc<RuntimeData>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    pub config_entries: Vec<String>,
}

/// Payload published when an event-worthy property changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyEvent {
    pub charger_id: String,
    pub entry_id: String,
    pub property: String,
    pub value: Value,
}

/// The home automation platform: registries and the event bus.
pub trait Host: Send + Sync {
    fn device(&self, device_id: &str) -> Option<Device>;

    fn config_entry(&self, entry_id: &str) -> Option<Arc<ConfigEntry>>;

    fn fire_event(&self, event_type: &str, data: Value) -> Result<(), BoxError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct FiredEvent {
    pub event_type: String,
    pub data: Value,
    pub time_fired: DateTime<Utc>,
}

/// A self-contained [`Host`] keeping registries in memory.
#[derive(Clone)]
pub struct InMemoryHost {
    devices: Arc<Mutex<HashMap<String, Device>>>,
    entries: Arc<Mutex<HashMap<String, Arc<ConfigEntry>>>>,
    fired: Arc<Mutex<Vec<FiredEvent>>>,
    sender: broadcast::Sender<FiredEvent>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryHost {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self {
            devices: Arc::new(Mutex::new(HashMap::new())),
            entries: Arc::new(Mutex::new(HashMap::new())),
            fired: Arc::new(Mutex::new(Vec::new())),
            sender,
        }
    }

    pub fn add_device(&self, device: Device) {
        lock(&self.devices).insert(device.id.clone(), device);
    }

    pub fn add_entry(&self, entry: ConfigEntry) -> Arc<ConfigEntry> {
        let entry = Arc::new(entry);
        lock(&self.entries).insert(entry.entry_id.clone(), Arc::clone(&entry));
        entry
    }

    pub fn remove_entry(&self, entry_id: &str) -> Option<Arc<ConfigEntry>> {
        lock(&self.entries).remove(entry_id)
    }

    pub fn fired_events(&self) -> Vec<FiredEvent> {
        lock(&self.fired).clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FiredEvent> {
        self.sender.subscribe()
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for InMemoryHost {
    fn device(&self, device_id: &str) -> Option<Device> {
        lock(&self.devices).get(device_id).cloned()
    }

    fn config_entry(&self, entry_id: &str) -> Option<Arc<ConfigEntry>> {
        lock(&self.entries).get(entry_id).cloned()
    }

    fn fire_event(&self, event_type: &str, data: Value) -> Result<(), BoxError> {
        let event = FiredEvent {
            event_type: event_type.to_string(),
            data,
            time_fired: Utc::now(),
        };
        lock(&self.fired).push(event.clone());
        let _ = self.sender.send(event);
        Ok(())
    }
}
