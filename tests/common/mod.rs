#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::sleep;
use wattpilot_glue::error::BoxError;
use wattpilot_glue::{ChargerClient, ChargerFactory, LegacyTransport, PropertyStore, PushEntity};

/// When the charger flips its readiness flags after `connect`.
#[derive(Clone, Copy, Debug)]
pub enum Readiness {
    After { connected: u64, initialized: u64 },
    ConnectedOnly,
    Never,
}

pub struct FakeTransport {
    pub closed: AtomicBool,
    pub fail_close: bool,
    connected: Arc<AtomicBool>,
}

impl LegacyTransport for FakeTransport {
    fn close(&self) -> Result<(), BoxError> {
        if self.fail_close {
            return Err("socket already gone".into());
        }
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn clear_connected(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

pub struct FakeCharger {
    pub name: String,
    pub store: Option<PropertyStore>,
    pub readiness: Readiness,
    pub connected: Arc<AtomicBool>,
    pub initialized: Arc<AtomicBool>,
    pub connects: AtomicUsize,
    pub disconnects: AtomicUsize,
    pub sent: Mutex<Vec<(String, Value)>>,
    pub fail_connect: bool,
    pub fail_send: bool,
    pub fail_disconnect: bool,
    pub public_disconnect: bool,
    pub transport: Option<FakeTransport>,
}

impl FakeCharger {
    pub fn new(name: &str, store: PropertyStore) -> Self {
        Self {
            name: name.to_string(),
            store: Some(store),
            readiness: Readiness::After { connected: 0, initialized: 0 },
            connected: Arc::new(AtomicBool::new(false)),
            initialized: Arc::new(AtomicBool::new(false)),
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            fail_connect: false,
            fail_send: false,
            fail_disconnect: false,
            public_disconnect: true,
            transport: None,
        }
    }

    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn without_store(mut self) -> Self {
        self.store = None;
        self
    }

    /// A client from before the library had a public disconnect.
    pub fn legacy(mut self, fail_close: bool) -> Self {
        self.public_disconnect = false;
        self.transport = Some(FakeTransport {
            closed: AtomicBool::new(false),
            fail_close,
            connected: Arc::clone(&self.connected),
        });
        self
    }

    pub fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChargerClient for FakeCharger {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn all_props(&self) -> Option<&PropertyStore> {
        self.store.as_ref()
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn all_props_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<(), BoxError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            return Err("connection refused".into());
        }
        let connected = Arc::clone(&self.connected);
        let initialized = Arc::clone(&self.initialized);
        match self.readiness {
            Readiness::After { connected: after_connect, initialized: after_init } => {
                tokio::spawn(async move {
                    sleep(Duration::from_secs(after_connect)).await;
                    connected.store(true, Ordering::SeqCst);
                    sleep(Duration::from_secs(after_init.saturating_sub(after_connect))).await;
                    initialized.store(true, Ordering::SeqCst);
                });
            }
            Readiness::ConnectedOnly => connected.store(true, Ordering::SeqCst),
            Readiness::Never => {}
        }
        Ok(())
    }

    async fn send_update(&self, identifier: &str, value: Value) -> Result<(), BoxError> {
        if self.fail_send {
            return Err("websocket closed".into());
        }
        self.sent.lock().unwrap().push((identifier.to_string(), value));
        Ok(())
    }

    fn has_disconnect(&self) -> bool {
        self.public_disconnect
    }

    async fn disconnect(&self) -> Result<(), BoxError> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        if self.fail_disconnect {
            return Err("already disconnected".into());
        }
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn legacy_transport(&self) -> Option<&dyn LegacyTransport> {
        self.transport.as_ref().map(|transport| transport as &dyn LegacyTransport)
    }
}

/// Records every client it builds as `(address, password, serial, cloud)`.
pub struct FakeFactory {
    pub readiness: Readiness,
    pub created: Mutex<Vec<(Option<String>, Option<String>, Option<String>, bool)>>,
}

impl FakeFactory {
    pub fn new(readiness: Readiness) -> Self {
        Self {
            readiness,
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn created(&self) -> Vec<(Option<String>, Option<String>, Option<String>, bool)> {
        self.created.lock().unwrap().clone()
    }
}

impl ChargerFactory for FakeFactory {
    fn create(
        &self,
        address: Option<&str>,
        password: Option<&str>,
        serial: Option<&str>,
        cloud: bool,
    ) -> Result<Arc<dyn ChargerClient>, BoxError> {
        self.created.lock().unwrap().push((
            address.map(str::to_string),
            password.map(str::to_string),
            serial.map(str::to_string),
            cloud,
        ));
        let name = serial.or(address).unwrap_or("unknown");
        Ok(Arc::new(FakeCharger::new(name, PropertyStore::new()).with_readiness(self.readiness)))
    }
}

/// An entity forwarding every pushed value to a channel.
pub struct RecordingEntity {
    sender: mpsc::UnboundedSender<Value>,
}

impl RecordingEntity {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Value>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { sender }), receiver)
    }
}

#[async_trait::async_trait]
impl PushEntity for RecordingEntity {
    async fn local_push(&self, value: Value) {
        let _ = self.sender.send(value);
    }
}

pub fn same_charger(a: &Arc<dyn ChargerClient>, b: &Arc<dyn ChargerClient>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const u8, Arc::as_ptr(b) as *const u8)
}
