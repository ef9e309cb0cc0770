//! Queue and idle-scheduler configuration structures.

use serde::{Deserialize, Serialize};

const fn default_frame_budget_ms() -> u64 {
    50
}

const fn default_dispatch_delay_ms() -> u64 {
    1
}

/// Timings for the timer-driven idle scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleConfig {
    /// Budget of one idle slice, counted from the request, in milliseconds.
    #[serde(default = "default_frame_budget_ms")]
    pub frame_budget_ms: u64,
    /// Delay between a request and its dispatch, in milliseconds.
    #[serde(default = "default_dispatch_delay_ms")]
    pub dispatch_delay_ms: u64,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            frame_budget_ms: default_frame_budget_ms(),
            dispatch_delay_ms: default_dispatch_delay_ms(),
        }
    }
}

impl IdleConfig {
    /// Validate idle timing values.
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_budget_ms == 0 {
            return Err("frame_budget_ms must be greater than 0".into());
        }
        if self.dispatch_delay_ms >= self.frame_budget_ms {
            return Err("dispatch_delay_ms must be less than frame_budget_ms".into());
        }
        Ok(())
    }
}

/// Root queue configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Idle scheduler timings.
    #[serde(default)]
    pub idle: IdleConfig,
}

impl QueueConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), String> {
        self.idle
            .validate()
            .map_err(|e| format!("idle config invalid: {e}"))
    }

    /// Parse queue configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
