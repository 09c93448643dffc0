//! Resource Catalogue assembly (§4.2).
//!
//! Grounded on `original_source/pilot/pilot_compute_service.py`'s
//! `initialize_dreamer` and `original_source/pilot/util/
//! quantum_resource_generator.py`'s `get_quantum_resources_for_executor`.
//! The generator itself is an external collaborator (§1's "Out of scope");
//! this crate only consumes it through `ResourceGenerator`.

use indexmap::IndexMap;
use qpilot_types::{PilotJob, QuantumPilotConfig, QuantumResource};

use crate::error::{DreamerError, DreamerResult};

/// Produces the resource set a quantum pilot contributes, keyed by the
/// executor family and its config. Implemented outside this crate (the
/// "Resource Generator" of §4.2); a test double lives in this module's
/// tests.
pub trait ResourceGenerator: Send + Sync {
    fn resources_for_executor(&self, executor: &str, config: &QuantumPilotConfig) -> Vec<QuantumResource>;
}

/// An insertion-ordered catalogue, keyed by (already-namespaced) resource
/// name. Insertion order matters for round-robin and tie-breaking (§4.3).
pub type Catalogue = IndexMap<String, QuantumResource>;

/// Enumerate quantum pilots, ask the generator for each one's resources,
/// prefix every resource name with its origin pilot (§3 invariant 1), and
/// combine into one catalogue.
///
/// Fails with `NoQuantumPilots` if no pilot declares `resource_type =
/// "quantum"`, `NoResources` if the combined catalogue ends up empty.
pub fn assemble_catalogue(pilots: &[PilotJob], generator: &dyn ResourceGenerator) -> DreamerResult<Catalogue> {
    let quantum_pilots: Vec<&PilotJob> = pilots.iter().filter(|p| p.description.is_quantum()).collect();
    if quantum_pilots.is_empty() {
        return Err(DreamerError::NoQuantumPilots);
    }

    let mut catalogue = Catalogue::new();
    for pilot in quantum_pilots {
        let Some(quantum_config) = pilot.description.quantum.as_ref() else {
            continue;
        };
        let resources = generator.resources_for_executor(&quantum_config.executor, quantum_config);
        for resource in resources {
            let namespaced = resource.namespaced(&pilot.description.name);
            catalogue.insert(namespaced.name.clone(), namespaced);
        }
    }

    if catalogue.is_empty() {
        return Err(DreamerError::NoResources);
    }

    Ok(catalogue)
}
