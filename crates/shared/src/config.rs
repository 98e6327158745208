//! Policy configuration management.
//!
//! Policy tables are expressed here with *string* role, grade, and
//! leave-type names exactly as they appear in configuration files.
//! Canonicalization into the closed enums happens in `furlough-core`
//! at the boundary; unknown names fail there as configuration errors.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Top-level policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Per-leave-type entitlement policies.
    #[serde(default)]
    pub leave_policies: Vec<LeavePolicyEntry>,
    /// Approval chain routing rules.
    #[serde(default)]
    pub chain_rules: Vec<ChainRuleEntry>,
    /// Months after year-end before carried-forward days expire.
    #[serde(default = "default_carryover_expiry_months")]
    pub carryover_expiry_months: u32,
}

fn default_carryover_expiry_months() -> u32 {
    6
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            leave_policies: Vec::new(),
            chain_rules: Vec::new(),
            carryover_expiry_months: default_carryover_expiry_months(),
        }
    }
}

/// One leave-type entitlement policy.
#[derive(Debug, Clone, Deserialize)]
pub struct LeavePolicyEntry {
    /// Leave type name (canonicalized in core).
    pub leave_type: String,
    /// Days granted at the start of each leave year.
    pub annual_entitlement: Decimal,
    /// Maximum days that may carry forward at year-end.
    pub max_carryover: Decimal,
}

/// One approval chain routing rule.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainRuleEntry {
    /// Employee grades this rule applies to (empty = all grades).
    #[serde(default)]
    pub grades: Vec<String>,
    /// Leave types this rule applies to (empty = all types).
    #[serde(default)]
    pub leave_types: Vec<String>,
    /// Ordered approver roles, one per approval level.
    pub levels: Vec<String>,
    /// Terminal status when every level signs off ("approved" or "recorded").
    #[serde(default = "default_completion_status")]
    pub completion_status: String,
    /// Priority for rule selection (lower = higher priority).
    pub priority: i16,
}

fn default_completion_status() -> String {
    "approved".to_string()
}

impl PolicyConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FURLOUGH").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
