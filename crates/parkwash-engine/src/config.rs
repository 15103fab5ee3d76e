//! # Engine Configuration
//!
//! Deployment-level knobs for the lifecycle managers. The deployment
//! layer deserializes this from its own config file and hands it to the
//! manager constructors.

use serde::{Deserialize, Serialize};

use parkwash_core::TariffPolicy;

/// Engine configuration.
///
/// ## Example
/// ```rust
/// use parkwash_engine::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(
///     r#"{ "tariff_policy": "hourly_with_daily_overflow" }"#,
/// ).unwrap();
/// assert_eq!(config.max_code_retries, 3);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which billing rule `process_exit` applies. The two policies are
    /// never mixed within one deployment.
    pub tariff_policy: TariffPolicy,

    /// How many fresh codes to try when an insert reports a code
    /// collision before giving up with `CodeExhausted`.
    pub max_code_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tariff_policy: TariffPolicy::Fractional,
            max_code_retries: 3,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
