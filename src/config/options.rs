//! Task options supplied as JSON.
//!
//! Statically built [`TaskOptions`] cannot be malformed; options that arrive
//! as data are checked here and rejected with
//! [`SchedulerError::InvalidArgument`].

use std::sync::Arc;

use serde_json::Value;

use crate::core::{Payload, SchedulerError, TaskOptions};

fn bool_field(map: &serde_json::Map<String, Value>, key: &str, default: bool) -> Result<bool, SchedulerError> {
    match map.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| SchedulerError::InvalidArgument(format!("options.{key} must be a boolean."))),
    }
}

impl TaskOptions {
    /// Build options from a JSON object.
    ///
    /// Recognized keys: `context`, `receiver` (any JSON, delivered as
    /// `serde_json::Value`), `deadline_ms` (non-negative integer), `run_once`
    /// and `immediate` (booleans). Unknown keys are ignored.
    pub fn from_json_value(value: &Value) -> Result<Self, SchedulerError> {
        let map = value
            .as_object()
            .ok_or_else(|| SchedulerError::InvalidArgument("options argument must be an object.".into()))?;

        let deadline_ms = match map.get("deadline_ms") {
            None => 0,
            Some(deadline) => deadline.as_u64().ok_or_else(|| {
                SchedulerError::InvalidArgument("options.deadline_ms must be a number.".into())
            })?,
        };

        let mut options = Self::new()
            .with_deadline_ms(deadline_ms)
            .with_run_once(bool_field(map, "run_once", true)?)
            .with_immediate(bool_field(map, "immediate", true)?);
        options.context = map.get("context").map(|c| Arc::new(c.clone()) as Payload);
        options.receiver = map.get("receiver").map(|r| Arc::new(r.clone()) as Payload);
        Ok(options)
    }
}
