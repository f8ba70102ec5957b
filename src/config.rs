use std::fmt;
use serde::{Deserialize, Serialize};
use crate::constants::{DEBUG_EXCLUDED_PROPERTIES, DEFAULT_NAME, DEFAULT_TIMEOUT};

/// How a charger is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ConnectionMode {
    #[default]
    Local,
    Cloud,
    Unknown(String),
}

impl From<String> for ConnectionMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "local" => ConnectionMode::Local,
            "cloud" => ConnectionMode::Cloud,
            _ => ConnectionMode::Unknown(value),
        }
    }
}

impl From<ConnectionMode> for String {
    fn from(value: ConnectionMode) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionMode::Local => f.write_str("local"),
            ConnectionMode::Cloud => f.write_str("cloud"),
            ConnectionMode::Unknown(other) => f.write_str(other),
        }
    }
}

/// Connection data stored with a config entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConnectionParams {
    #[serde(default)]
    pub connection: ConnectionMode,
    pub ip_address: Option<String>,
    pub serial: Option<String>,
    pub password: Option<String>,
    pub friendly_name: Option<String>,
    pub timeout: Option<u64>,
}

impl ConnectionParams {
    pub fn local(ip_address: &str, password: &str) -> Self {
        Self {
            connection: ConnectionMode::Local,
            ip_address: Some(ip_address.to_string()),
            password: Some(password.to_string()),
            ..Default::default()
        }
    }

    pub fn cloud(serial: &str, password: &str) -> Self {
        Self {
            connection: ConnectionMode::Cloud,
            serial: Some(serial.to_string()),
            password: Some(password.to_string()),
            ..Default::default()
        }
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    pub fn timeout(&self) -> u64 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Label used to tag events: friendly name, else address, else the default name.
    pub fn charger_label(&self) -> String {
        self.friendly_name
            .as_deref()
            .or(self.ip_address.as_deref())
            .unwrap_or(DEFAULT_NAME)
            .to_string()
    }
}

/// Which property changes get written to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DebugProperties {
    All(bool),
    Only(Vec<String>),
}

impl Default for DebugProperties {
    fn default() -> Self {
        DebugProperties::All(false)
    }
}

impl DebugProperties {
    pub fn is_enabled(&self) -> bool {
        match self {
            DebugProperties::All(enabled) => *enabled,
            DebugProperties::Only(list) => !list.is_empty(),
        }
    }

    /// An explicit list bypasses the exclusion list; the blanket flag does not.
    pub fn includes(&self, identifier: &str) -> bool {
        match self {
            DebugProperties::Only(list) => list.iter().any(|item| item == identifier),
            DebugProperties::All(_) => !DEBUG_EXCLUDED_PROPERTIES.contains(&identifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entry_data() {
        let params = ConnectionParams::from_json(
            r#"{"connection": "cloud", "serial": "91234567", "password": "secret", "timeout": 30}"#,
        ).unwrap();
        assert_eq!(params.connection, ConnectionMode::Cloud);
        assert_eq!(params.serial.as_deref(), Some("91234567"));
        assert_eq!(params.timeout(), 30);
    }

    #[test]
    fn missing_connection_defaults_to_local() {
        let params = ConnectionParams::from_json(r#"{"ip_address": "10.0.0.5"}"#).unwrap();
        assert_eq!(params.connection, ConnectionMode::Local);
        assert_eq!(params.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn unknown_connection_is_preserved() {
        let params = ConnectionParams::from_json(r#"{"connection": "bluetooth"}"#).unwrap();
        assert_eq!(params.connection, ConnectionMode::Unknown("bluetooth".to_string()));
        assert_eq!(params.connection.to_string(), "bluetooth");
    }

    #[test]
    fn charger_label_prefers_friendly_name() {
        let mut params = ConnectionParams::local("10.0.0.5", "pw");
        assert_eq!(params.charger_label(), "10.0.0.5");
        params.friendly_name = Some("Garage".to_string());
        assert_eq!(params.charger_label(), "Garage");
        assert_eq!(ConnectionParams::default().charger_label(), DEFAULT_NAME);
    }

    #[test]
    fn debug_properties_accepts_bool_or_list() {
        let all: DebugProperties = serde_json::from_str("true").unwrap();
        assert_eq!(all, DebugProperties::All(true));
        let only: DebugProperties = serde_json::from_str(r#"["amp", "nrg"]"#).unwrap();
        assert!(only.is_enabled());
        assert!(!DebugProperties::Only(vec![]).is_enabled());
        assert!(!DebugProperties::default().is_enabled());
    }

    #[test]
    fn blanket_debug_skips_noisy_properties() {
        let all = DebugProperties::All(true);
        assert!(all.includes("amp"));
        assert!(!all.includes("nrg"));

        let only = DebugProperties::Only(vec!["nrg".to_string()]);
        assert!(only.includes("nrg"));
        assert!(!only.includes("amp"));
    }
}
