use std::time::Duration;

pub const DOMAIN: &str = "wattpilot";
pub const DEFAULT_NAME: &str = "Wattpilot";

/// Seconds to wait for a charger to report connected and initialized.
pub const DEFAULT_TIMEOUT: u64 = 15;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const EVENT_PROPS_ID: &str = "wattpilot_property_message";

/// Properties whose changes are published on the host event bus.
pub const EVENT_PROPS: &[&str] = &[
    "acs",
    "car",
    "cus",
    "err",
    "ffna",
    "fna",
    "frc",
    "lmo",
    "modelStatus",
    "trx",
    "ust",
    "wst",
];

/// High frequency telemetry that would drown the log when every property is watched.
pub const DEBUG_EXCLUDED_PROPERTIES: &[&str] = &[
    "efh",
    "efh32",
    "efh8",
    "ehs",
    "emhb",
    "fbuf_age",
    "fbuf_pAkku",
    "fbuf_pGrid",
    "fbuf_pPv",
    "fhz",
    "loc",
    "lps",
    "nrg",
    "rbt",
    "rcd",
    "rfb",
    "rssi",
    "tma",
    "tpcm",
    "utc",
    "fbuf_akkuSOC",
    "lpsc",
    "pvopt_averagePAkku",
    "pvopt_averagePGrid",
    "pvopt_averagePPv",
    "pvopt_deltaP",
];
