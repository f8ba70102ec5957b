use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use serde_json::Value;
use tokio::sync::mpsc;

/// The charger's reported state. Written by the charger client when protocol
/// messages arrive, read everywhere else.
#[derive(Clone, Debug)]
pub struct PropertyStore {
    props: Arc<Mutex<BTreeMap<String, Value>>>,
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<PropertyChange>>>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyChange {
    pub identifier: String,
    pub value: Value,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PropertyStore {
    pub fn new() -> Self {
        Self {
            props: Arc::new(Mutex::new(BTreeMap::new())),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Stores a reported value and notifies subscribers when it differs from the old one.
    /// Every subscriber sees every change, however many arrive before it gets to run.
    pub fn apply(&self, identifier: &str, value: Value) {
        let changed = {
            let mut props = lock(&self.props);
            let old = props.insert(identifier.to_string(), value.clone());
            old.as_ref() != Some(&value)
        };
        if changed {
            let change = PropertyChange {
                identifier: identifier.to_string(),
                value,
            };
            lock(&self.subscribers).retain(|subscriber| subscriber.send(change.clone()).is_ok());
        }
    }

    pub fn get(&self, identifier: &str) -> Option<Value> {
        lock(&self.props).get(identifier).cloned()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        lock(&self.props).contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        lock(&self.props).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.props).is_empty()
    }

    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        lock(&self.props).clone()
    }

    /// Receives every change applied from now on. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<PropertyChange> {
        let (sender, receiver) = mpsc::unbounded_channel();
        lock(&self.subscribers).push(sender);
        receiver
    }
}

impl Default for PropertyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for PropertyStore {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let store = Self::new();
        lock(&store.props).extend(iter.into_iter().map(|(key, value)| (key.into(), value)));
        store
    }
}
