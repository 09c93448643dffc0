//! `PilotJob` and the pilot description input map (§3, §6).

use serde_json::Value;
use uuid::Uuid;

use crate::error::TypesError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PilotState {
    Pending,
    Running,
    Done,
    Failed,
    Cancelled,
}

/// The `quantum` sub-map, consulted only when `resource_type == "quantum"`.
#[derive(Debug, Clone, Default)]
pub struct QuantumPilotConfig {
    pub executor: String,
    pub devices: Vec<String>,
    pub backend: Option<String>,
    pub custom_backends: Option<Value>,
    pub token: Option<String>,
}

/// Recognized keys of the pilot description input map (§6).
#[derive(Debug, Clone)]
pub struct PilotDescription {
    pub resource: Option<String>,
    pub working_directory: Option<String>,
    pub pilot_type: Option<String>,
    pub number_of_nodes: u32,
    pub cores_per_node: u32,
    pub queue: Option<String>,
    pub walltime: Option<String>,
    pub project: Option<String>,
    pub scheduler_script_commands: Vec<String>,
    pub name: String,
    pub resource_type: Option<String>,
    pub quantum: Option<QuantumPilotConfig>,
    pub dreamer_enabled: bool,
}

impl PilotDescription {
    pub fn is_quantum(&self) -> bool {
        self.resource_type.as_deref() == Some("quantum")
    }

    /// Parse a pilot description from an untyped JSON map, applying the
    /// documented defaults (`number_of_nodes`/`cores_per_node` default to
    /// 1, 1 — per §6, quantum pilots default to 1,1, and this crate applies
    /// the same default uniformly since no other default is specified for
    /// classical pilots).
    pub fn from_value(value: &Value) -> Result<Self, TypesError> {
        let obj = value
            .as_object()
            .ok_or_else(|| TypesError::InvalidPilotDescription("expected a JSON object".into()))?;

        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("pilot-{}", Uuid::new_v4()));

        let resource_type = obj.get("resource_type").and_then(Value::as_str).map(str::to_string);

        let quantum = if resource_type.as_deref() == Some("quantum") {
            let q = obj.get("quantum").ok_or_else(|| {
                TypesError::InvalidPilotDescription(
                    "resource_type=quantum requires a `quantum` sub-map".into(),
                )
            })?;
            Some(parse_quantum_config(q)?)
        } else {
            None
        };

        Ok(Self {
            resource: obj.get("resource").and_then(Value::as_str).map(str::to_string),
            working_directory: obj
                .get("working_directory")
                .and_then(Value::as_str)
                .map(str::to_string),
            pilot_type: obj.get("type").and_then(Value::as_str).map(str::to_string),
            number_of_nodes: obj
                .get("number_of_nodes")
                .and_then(Value::as_u64)
                .map(|n| n as u32)
                .unwrap_or(1),
            cores_per_node: obj
                .get("cores_per_node")
                .and_then(Value::as_u64)
                .map(|n| n as u32)
                .unwrap_or(1),
            queue: obj.get("queue").and_then(Value::as_str).map(str::to_string),
            walltime: obj.get("walltime").and_then(Value::as_str).map(str::to_string),
            project: obj.get("project").and_then(Value::as_str).map(str::to_string),
            scheduler_script_commands: obj
                .get("scheduler_script_commands")
                .and_then(Value::as_array)
                .map(|a| a.iter().filter_map(Value::as_str).map(str::to_string).collect())
                .unwrap_or_default(),
            name,
            resource_type,
            quantum,
            dreamer_enabled: obj.get("dreamer_enabled").and_then(Value::as_bool).unwrap_or(false),
        })
    }
}

fn parse_quantum_config(value: &Value) -> Result<QuantumPilotConfig, TypesError> {
    let obj = value
        .as_object()
        .ok_or_else(|| TypesError::InvalidPilotDescription("`quantum` must be an object".into()))?;

    let executor = obj
        .get("executor")
        .and_then(Value::as_str)
        .ok_or_else(|| TypesError::InvalidPilotDescription("`quantum.executor` is required".into()))?
        .to_string();

    Ok(QuantumPilotConfig {
        executor,
        devices: obj
            .get("devices")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default(),
        backend: obj.get("backend").and_then(Value::as_str).map(str::to_string),
        custom_backends: obj.get("custom_backends").cloned(),
        token: obj.get("token").and_then(Value::as_str).map(str::to_string),
    })
}

/// A handle to an external worker pool (§3).
#[derive(Debug, Clone)]
pub struct PilotJob {
    pub id: String,
    pub state: PilotState,
    pub description: PilotDescription,
}

impl PilotJob {
    pub fn new(description: PilotDescription) -> Self {
        Self {
            id: description.name.clone(),
            state: PilotState::Pending,
            description,
        }
    }
}
