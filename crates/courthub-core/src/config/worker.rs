//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the background scheduler runs in this process.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Cron expression (with seconds) for the soft-lock expiry sweep.
    #[serde(default = "default_lock_sweep_cron")]
    pub lock_sweep_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            lock_sweep_cron: default_lock_sweep_cron(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_lock_sweep_cron() -> String {
    "*/30 * * * * *".to_string()
}
