use log::{debug, error, warn};
use serde_json::Value;
use crate::client::ChargerClient;
use crate::constants::DOMAIN;
use crate::error::{GlueError, Result};
use crate::value::{coerce, ForceType, RawValue};

/// Options for [`set_charger_prop`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Send even if the charger never reported this property.
    pub force: bool,
    pub force_type: Option<ForceType>,
}

impl SetOptions {
    pub fn forced() -> Self {
        Self { force: true, force_type: None }
    }

    pub fn with_type(hint: &str) -> Self {
        Self { force: false, force_type: ForceType::parse(hint) }
    }
}

/// Current value of a charger property, or `default` when it cannot be read or is null.
pub fn get_charger_prop(
    charger: &dyn ChargerClient,
    identifier: Option<&str>,
    default: Option<Value>,
) -> Option<Value> {
    match read_prop(charger, identifier) {
        Ok(Value::Null) => default,
        Ok(value) => Some(value),
        Err(err) => {
            error!("{} - get_charger_prop: {}", DOMAIN, err);
            default
        }
    }
}

/// Like [`get_charger_prop`], yielding to the scheduler before the read.
pub async fn async_get_charger_prop(
    charger: &dyn ChargerClient,
    identifier: Option<&str>,
    default: Option<Value>,
) -> Option<Value> {
    tokio::task::yield_now().await;
    get_charger_prop(charger, identifier, default)
}

fn read_prop(charger: &dyn ChargerClient, identifier: Option<&str>) -> Result<Value> {
    let store = charger.all_props().ok_or(GlueError::MissingStore)?;
    let identifier = identifier.ok_or(GlueError::MissingIdentifier)?;
    store
        .get(identifier)
        .ok_or_else(|| GlueError::UnknownProperty(identifier.to_string()))
}

/// Coerces `value` and sends it to the charger. Returns whether the update was sent.
pub async fn set_charger_prop(
    charger: &dyn ChargerClient,
    identifier: Option<&str>,
    value: Option<RawValue>,
    options: SetOptions,
) -> bool {
    match try_set(charger, identifier, value, options).await {
        Ok(()) => true,
        Err(err) => {
            error!("{} - set_charger_prop: Could not set property: {}", DOMAIN, err);
            false
        }
    }
}

async fn try_set(
    charger: &dyn ChargerClient,
    identifier: Option<&str>,
    value: Option<RawValue>,
    options: SetOptions,
) -> Result<()> {
    let store = charger.all_props().ok_or(GlueError::MissingStore)?;
    let identifier = identifier.ok_or(GlueError::MissingIdentifier)?;
    if !options.force && !store.contains(identifier) {
        return Err(GlueError::UnknownProperty(identifier.to_string()));
    }
    let value = value.ok_or_else(|| GlueError::MissingValue(identifier.to_string()))?;

    debug!("{} - set_charger_prop: Prepare new property value: {}={}", DOMAIN, identifier, value);
    if options.force_type.is_none() && matches!(value, RawValue::Fields(_)) {
        warn!(
            "{} - set_charger_prop: field mapping set is untested: {}={}",
            DOMAIN, identifier, value
        );
    }
    let coerced = coerce(&value, options.force_type)?;

    debug!(
        "{} - set_charger_prop: Send property update to charger: {}={}",
        DOMAIN, identifier, coerced
    );
    charger
        .send_update(identifier, coerced)
        .await
        .map_err(GlueError::Client)?;
    tokio::task::yield_now().await;
    Ok(())
}
