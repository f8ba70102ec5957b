use log::{debug, error};
use crate::client::ChargerClient;
use crate::config::ConnectionParams;
use crate::constants::DOMAIN;
use crate::error::BoxError;
use crate::host::RuntimeData;

/// Types that can list their fields for debugging. Names starting with `_` are private.
pub trait Inspect {
    fn describe(&self) -> String;

    fn fields(&self) -> Result<Vec<(String, String)>, BoxError>;
}

fn is_private(name: &str) -> bool {
    name.starts_with('_')
}

/// Logs every public field of `obj`, or all of them with `show_all`. Never fails.
pub fn programming_debug(obj: &dyn Inspect, show_all: bool) {
    debug!("{} - programming_debug: {}", DOMAIN, obj.describe());
    match obj.fields() {
        Ok(fields) => {
            for (name, value) in fields.iter().filter(|(name, _)| show_all || !is_private(name)) {
                debug!("{} - programming_debug: {} = {}", DOMAIN, name, value);
            }
        }
        Err(err) => error!("{} - programming_debug: failed: {}", DOMAIN, err),
    }
}

/// Like [`programming_debug`], yielding to the scheduler after each field.
pub async fn async_programming_debug(obj: &(dyn Inspect + Sync), show_all: bool) {
    debug!("{} - async_programming_debug: {}", DOMAIN, obj.describe());
    let fields = match obj.fields() {
        Ok(fields) => fields,
        Err(err) => {
            error!("{} - async_programming_debug: failed: {}", DOMAIN, err);
            return;
        }
    };
    for (name, value) in fields {
        if show_all || !is_private(&name) {
            debug!("{} - async_programming_debug: {} = {}", DOMAIN, name, value);
        }
        tokio::task::yield_now().await;
    }
}

impl Inspect for ConnectionParams {
    fn describe(&self) -> String {
        format!("ConnectionParams({})", self.charger_label())
    }

    fn fields(&self) -> Result<Vec<(String, String)>, BoxError> {
        Ok(vec![
            ("connection".to_string(), self.connection.to_string()),
            ("ip_address".to_string(), format!("{:?}", self.ip_address)),
            ("serial".to_string(), format!("{:?}", self.serial)),
            ("friendly_name".to_string(), format!("{:?}", self.friendly_name)),
            ("timeout".to_string(), self.timeout().to_string()),
            ("_password".to_string(), format!("{:?}", self.password)),
        ])
    }
}

impl Inspect for RuntimeData {
    fn describe(&self) -> String {
        format!("RuntimeData({})", self.charger.name())
    }

    fn fields(&self) -> Result<Vec<(String, String)>, BoxError> {
        let mut entities: Vec<&str> = self.push_entities.keys().map(String::as_str).collect();
        entities.sort_unstable();
        Ok(vec![
            ("charger".to_string(), self.charger.name()),
            ("push_entities".to_string(), entities.join(", ")),
            ("params".to_string(), self.params.describe()),
            ("debug_properties".to_string(), serde_json::to_string(&self.debug_properties)?),
        ])
    }
}

/// Lists a charger client's state.
pub struct ChargerInspector<'a>(pub &'a dyn ChargerClient);

impl Inspect for ChargerInspector<'_> {
    fn describe(&self) -> String {
        format!("Charger({})", self.0.name())
    }

    fn fields(&self) -> Result<Vec<(String, String)>, BoxError> {
        let charger = self.0;
        let mut fields = vec![
            ("name".to_string(), charger.name()),
            ("connected".to_string(), charger.connected().to_string()),
            ("all_props_initialized".to_string(), charger.all_props_initialized().to_string()),
            ("_has_disconnect".to_string(), charger.has_disconnect().to_string()),
        ];
        if let Some(store) = charger.all_props() {
            fields.push(("all_props".to_string(), serde_json::to_string(&store.snapshot())?));
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Inspect for Broken {
        fn describe(&self) -> String {
            "Broken".to_string()
        }

        fn fields(&self) -> Result<Vec<(String, String)>, BoxError> {
            Err("no fields".into())
        }
    }

    #[test]
    fn params_hide_password_as_private() {
        let params = ConnectionParams::local("10.0.0.5", "secret");
        let fields = params.fields().unwrap();
        assert!(fields.iter().any(|(name, _)| name == "_password"));
        assert!(fields
            .iter()
            .filter(|(name, _)| !is_private(name))
            .all(|(_, value)| !value.contains("secret")));
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        programming_debug(&Broken, true);
        async_programming_debug(&Broken, false).await;
    }
}
