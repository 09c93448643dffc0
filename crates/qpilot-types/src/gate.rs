//! Gate-name normalization shared by tasks, resources, and the planner.

/// Lowercase a gate name and apply the documented `cnot -> cx` alias.
pub fn normalize_gate_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if lower == "cnot" {
        "cx".to_string()
    } else {
        lower
    }
}
