mod config;
mod store;
mod client;
mod charger;
mod props;
mod host;
mod lookup;
mod dispatch;
mod inspect;
mod resolver;
mod value;
pub mod constants;
pub mod error;
pub mod logging;

pub use self::config::{ConnectionMode, ConnectionParams, DebugProperties};
pub use self::store::{PropertyChange, PropertyStore};
pub use self::client::{ChargerClient, ChargerFactory, LegacyTransport};
pub use self::charger::{connect_charger, disconnect_charger, wait_until_ready, NotReady};
pub use self::props::{async_get_charger_prop, get_charger_prop, set_charger_prop, SetOptions};
pub use self::host::{
    ConfigEntry, Device, FiredEvent, Host, InMemoryHost, PropertyEvent, PushEntity, RuntimeData,
};
pub use self::lookup::{get_charger_from_device_id, get_data_store_from_device_id, DataStore};
pub use self::dispatch::{
    async_property_update, property_debug, watch_property_store, PropertyUpdateHandler,
};
pub use self::inspect::{async_programming_debug, programming_debug, ChargerInspector, Inspect};
pub use self::resolver::{LibraryOrigin, ModuleResolver, ResolvedLibrary};
pub use self::value::{coerce, ForceType, RawValue};
