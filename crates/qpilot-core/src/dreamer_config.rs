//! The DREAMER config input map (§6), parsed the same way
//! `PilotDescription::from_value` parses the pilot description map.

use qpilot_dreamer::ScoringMode;
use rustc_hash::FxHashMap;
use serde_json::Value;

/// Parsed `initialize_dreamer(config)` input.
#[derive(Debug, Clone)]
pub struct DreamerConfig {
    pub optimization_mode: ScoringMode,
    pub queue_dynamics: FxHashMap<String, f64>,
}

impl Default for DreamerConfig {
    /// `optimization_mode` defaults to `high_fidelity` when DREAMER is
    /// initialized without config (§6).
    fn default() -> Self {
        Self {
            optimization_mode: ScoringMode::HighFidelity,
            queue_dynamics: FxHashMap::default(),
        }
    }
}

impl DreamerConfig {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let optimization_mode = match obj.get("optimization_mode").and_then(Value::as_str) {
            Some("balanced") => ScoringMode::Balanced,
            Some("high_speed") => ScoringMode::HighSpeed,
            _ => ScoringMode::HighFidelity,
        };

        let queue_dynamics = obj
            .get("queue_dynamics")
            .and_then(Value::as_object)
            .map(|m| {
                m.iter()
                    .filter_map(|(name, util)| util.as_f64().map(|u| (name.clone(), u.clamp(0.0, 1.0))))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            optimization_mode,
            queue_dynamics,
        }
    }
}
