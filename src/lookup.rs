use std::collections::HashMap;
use std::sync::Arc;
use log::{debug, error};
use crate::client::ChargerClient;
use crate::config::{ConnectionParams, DebugProperties};
use crate::constants::DOMAIN;
use crate::error::{GlueError, Result};
use crate::host::{ConfigEntry, Host, PushEntity, RuntimeData};

/// The config entry behind a device together with its runtime data.
#[derive(Clone)]
pub struct DataStore {
    pub entry: Arc<ConfigEntry>,
    pub runtime_data: Arc<RuntimeData>,
}

impl DataStore {
    pub fn charger(&self) -> &Arc<dyn ChargerClient> {
        &self.runtime_data.charger
    }

    pub fn push_entities(&self) -> &HashMap<String, Arc<dyn PushEntity>> {
        &self.runtime_data.push_entities
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.runtime_data.params
    }

    pub fn debug_properties(&self) -> &DebugProperties {
        &self.runtime_data.debug_properties
    }
}

pub async fn get_data_store_from_device_id(host: &dyn Host, device_id: &str) -> Option<DataStore> {
    debug!("{} - get_data_store_from_device_id: receiving device: {}", DOMAIN, device_id);
    match find_data_store(host, device_id).await {
        Ok(store) => Some(store),
        Err(err) => {
            error!(
                "{} - get_data_store_from_device_id: Unable to receive data store: {}",
                DOMAIN, err
            );
            None
        }
    }
}

pub async fn get_charger_from_device_id(
    host: &dyn Host,
    device_id: &str,
) -> Option<Arc<dyn ChargerClient>> {
    debug!("{} - get_charger_from_device_id: receiving device: {}", DOMAIN, device_id);
    match find_data_store(host, device_id).await {
        Ok(store) => {
            debug!("{} - get_charger_from_device_id: return charger object", DOMAIN);
            Some(Arc::clone(store.charger()))
        }
        Err(err) => {
            error!("{} - get_charger_from_device_id: {}", DOMAIN, err);
            None
        }
    }
}

/// First entry of this integration attached to the device that has runtime data.
async fn find_data_store(host: &dyn Host, device_id: &str) -> Result<DataStore> {
    let device = host
        .device(device_id)
        .ok_or_else(|| GlueError::DeviceNotFound(device_id.to_string()))?;

    for entry_id in &device.config_entries {
        let Some(entry) = host.config_entry(entry_id) else {
            continue;
        };
        if entry.domain != DOMAIN {
            continue;
        }
        let Some(runtime_data) = entry.runtime_data.clone() else {
            continue;
        };
        tokio::task::yield_now().await;
        return Ok(DataStore { entry, runtime_data });
    }

    Err(GlueError::NoChargerForDevice(device_id.to_string()))
}
