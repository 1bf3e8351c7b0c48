//! Portal configuration.

use std::time::Duration;

use carenexus_session::DirectoryConfig;
use serde::{Deserialize, Serialize};

/// Settings for a [`Portal`](crate::Portal).
///
/// Every field has a default, so a config file only needs the fields it
/// changes:
///
/// ```json
/// { "simulatedLatencyMs": 1000, "directory": { "hashIterations": 50000 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortalConfig {
    /// Account numbering and password hashing.
    pub directory: DirectoryConfig,

    /// Delay applied before every sign-up, sign-in, and profile save, to
    /// mimic a network round trip. 0 disables it.
    pub simulated_latency_ms: u64,

    /// Whether empty catalog collections start with the demo data.
    pub seed_catalog: bool,
}

impl PortalConfig {
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            directory: DirectoryConfig::default(),
            simulated_latency_ms: 0,
            seed_catalog: true,
        }
    }
}
