//! The fixed and parametric gate sampling-overhead table (§4.6).
//!
//! Grounded on `original_source/pilot/dreamer.py`'s `_FIXED_OVERHEAD`,
//! `_PARAM_GATES`, and `_param_overhead`/`_gate_overhead`.

const FIXED_NINE: &[&str] = &["cx", "cz", "cy", "ch", "ecr"];
const FIXED_THREE_PLUS_TWO_ROOT_TWO: &[&str] = &["cs", "csdg", "csx"];
const FIXED_FORTY_NINE: &[&str] = &["iswap", "dcx"];
const PARAM_SIN_THETA: &[&str] = &["rzz", "rxx", "ryy", "rzx"];
const PARAM_SIN_HALF_THETA: &[&str] = &["crx", "cry", "crz", "cphase"];

/// Sampling-overhead multiplier for a two-qubit gate, or `None` if the gate
/// is unknown (and therefore not cuttable, per §4.6).
pub fn gate_overhead(gate: &str, theta: Option<f64>) -> Option<f64> {
    let g = gate.to_ascii_lowercase();
    if FIXED_NINE.contains(&g.as_str()) {
        return Some(9.0);
    }
    if FIXED_THREE_PLUS_TWO_ROOT_TWO.contains(&g.as_str()) {
        return Some(3.0 + 2.0 * std::f64::consts::SQRT_2);
    }
    if FIXED_FORTY_NINE.contains(&g.as_str()) {
        return Some(49.0);
    }
    if PARAM_SIN_THETA.contains(&g.as_str()) {
        let theta = theta?;
        return Some((1.0 + 2.0 * theta.sin().abs()).powi(2));
    }
    if PARAM_SIN_HALF_THETA.contains(&g.as_str()) {
        let theta = theta?;
        return Some((1.0 + 2.0 * (theta / 2.0).sin().abs()).powi(2));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn fixed_overheads_match_table() {
        assert_eq!(gate_overhead("cx", None), Some(9.0));
        assert_eq!(gate_overhead("ECR", None), Some(9.0));
        assert!((gate_overhead("csx", None).unwrap() - (3.0 + 2.0 * std::f64::consts::SQRT_2)).abs() < 1e-9);
        assert_eq!(gate_overhead("iswap", None), Some(49.0));
    }

    #[test]
    fn parametric_overheads_require_theta() {
        assert_eq!(gate_overhead("rzz", None), None);
        let overhead = gate_overhead("rzz", Some(PI / 6.0)).unwrap();
        let expected = (1.0 + 2.0 * (PI / 6.0_f64).sin().abs()).powi(2);
        assert!((overhead - expected).abs() < 1e-9);
    }

    #[test]
    fn half_theta_parametric_gates() {
        let overhead = gate_overhead("crx", Some(PI)).unwrap();
        let expected = (1.0 + 2.0 * (PI / 2.0_f64).sin().abs()).powi(2);
        assert!((overhead - expected).abs() < 1e-9);
    }

    #[test]
    fn unknown_gate_is_not_cuttable() {
        assert_eq!(gate_overhead("toffoli", None), None);
    }
}
