use std::sync::Arc;
use log::{debug, error, warn};
use thiserror::Error;
use tokio::time::sleep;
use crate::client::{ChargerClient, ChargerFactory};
use crate::config::{ConnectionMode, ConnectionParams};
use crate::constants::POLL_INTERVAL;
use crate::error::BoxError;

/// Why a charger did not become ready in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotReady {
    #[error("timeout - charger not connected")]
    NotConnected,
    #[error("timeout - charger not initialized")]
    NotInitialized,
    #[error("timeout - unknown reason")]
    Unknown,
}

/// Connects a charger, building a new client unless `existing` is given, and waits
/// until it reports connected and initialized. Returns `None` on any failure.
pub async fn connect_charger(
    label: &str,
    params: &ConnectionParams,
    factory: &dyn ChargerFactory,
    existing: Option<Arc<dyn ChargerClient>>,
) -> Option<Arc<dyn ChargerClient>> {
    let (charger, charger_id) = match establish(label, params, factory, existing).await {
        Ok(Some(found)) => found,
        Ok(None) => return None,
        Err(err) => {
            error!("{} - connect_charger: Connecting charger failed: {}", label, err);
            return None;
        }
    };

    debug!("{} - connect_charger: ensure charger is ready: {}", label, charger_id);
    let timeout = params.timeout();
    if let Err(reason) = wait_until_ready(charger.as_ref(), timeout).await {
        match reason {
            NotReady::NotConnected => {
                error!(
                    "{} - connect_charger: {}: {} ({} sec)",
                    label,
                    reason,
                    charger.connected(),
                    timeout
                );
                error!("{} - connect_charger: restart charger via Wattpilot app", label);
            }
            NotReady::NotInitialized => {
                error!(
                    "{} - connect_charger: {}: {} ({} sec)",
                    label,
                    reason,
                    charger.all_props_initialized(),
                    timeout
                );
            }
            NotReady::Unknown => {
                error!("{} - connect_charger: {}: {} sec", label, reason, timeout);
            }
        }
        return None;
    }

    debug!("{} - connect_charger: Charger connected: {}", label, charger.name());
    Some(charger)
}

async fn establish(
    label: &str,
    params: &ConnectionParams,
    factory: &dyn ChargerFactory,
    existing: Option<Arc<dyn ChargerClient>>,
) -> Result<Option<(Arc<dyn ChargerClient>, String)>, BoxError> {
    let password = params.password.as_deref();
    let (charger, charger_id) = match (existing, &params.connection) {
        (Some(charger), _) => {
            let name = charger.name();
            debug!("{} - connect_charger: Reconnect existing charger: {}", label, name);
            (charger, name)
        }
        (None, ConnectionMode::Local) => {
            let address = params.ip_address.as_deref();
            debug!("{} - connect_charger: Connecting local charger by ip: {:?}", label, address);
            let charger = factory.create(address, password, address, false)?;
            (charger, address.unwrap_or_default().to_string())
        }
        (None, ConnectionMode::Cloud) => {
            let serial = params.serial.as_deref();
            debug!("{} - connect_charger: Connecting cloud charger by serial: {:?}", label, serial);
            let charger = factory.create(serial, password, serial, true)?;
            (charger, serial.unwrap_or_default().to_string())
        }
        (None, ConnectionMode::Unknown(other)) => {
            warn!("{} - connect_charger: Unknown or empty connection type: {}", label, other);
            return Ok(None);
        }
    };
    charger.connect().await?;
    Ok(Some((charger, charger_id)))
}

/// Polls once per second until the charger is connected and initialized or
/// `timeout` seconds have passed.
pub async fn wait_until_ready(charger: &dyn ChargerClient, timeout: u64) -> Result<(), NotReady> {
    let is_ready = || charger.connected() && charger.all_props_initialized();

    let mut timer = 0;
    let mut ready = is_ready();
    while !ready && timer < timeout {
        sleep(POLL_INTERVAL).await;
        timer += 1;
        ready = is_ready();
    }
    if ready {
        return Ok(());
    }

    // The client flips its flags from its own task, so they may have settled since the last poll.
    if !charger.connected() {
        Err(NotReady::NotConnected)
    } else if !charger.all_props_initialized() {
        Err(NotReady::NotInitialized)
    } else {
        Err(NotReady::Unknown)
    }
}

/// Disconnects a charger. Never fails; problems are logged.
pub async fn disconnect_charger(label: &str, charger: &dyn ChargerClient) {
    debug!("{} - disconnect_charger: disconnect charger: {}", label, charger.name());
    if let Err(err) = try_disconnect(charger).await {
        error!("{} - disconnect_charger: Disconnect charger failed: {}", label, err);
    }
}

async fn try_disconnect(charger: &dyn ChargerClient) -> Result<(), BoxError> {
    if charger.has_disconnect() {
        return charger.disconnect().await;
    }
    // Clients without a public disconnect: close the socket ourselves.
    let transport = charger
        .legacy_transport()
        .ok_or("charger exposes neither disconnect nor a transport handle")?;
    transport.close()?;
    transport.clear_connected();
    Ok(())
}
