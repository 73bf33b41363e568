// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use lumen_sim::SimulationResult;

/// Reduces a results document to the scalar the optimizer sees.
///
/// The last node result wins when it carries an output amplitude: the
/// objective is its power `re² + im²`, regardless of measurement data
/// anywhere else in the document. Without a final amplitude the objective is
/// the sum of analog detector readouts; records without one contribute zero,
/// and an empty document reduces to zero. The extraction order is part of
/// the contract: it decides which gradient the optimizer follows.
pub fn extract_objective(result: &SimulationResult) -> f64 {
    if let Some((re, im)) = result
        .node_results
        .last()
        .and_then(|record| record.out_amplitude)
    {
        return re * re + im * im;
    }

    result
        .node_results
        .iter()
        .filter_map(|record| record.measurement.as_ref())
        .filter_map(|measurement| measurement.analog_value)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lumen_sim::{Measurement, NodeResult};

    fn amplitude(id: &str, re: f64, im: f64) -> NodeResult {
        NodeResult {
            node_id: id.to_string(),
            out_amplitude: Some((re, im)),
            phase_noise: 0.0,
            power_loss: 0.0,
            measurement: None,
        }
    }

    fn readout(id: &str, analog_value: Option<f64>) -> NodeResult {
        NodeResult {
            node_id: id.to_string(),
            out_amplitude: None,
            phase_noise: 0.0,
            power_loss: 0.0,
            measurement: Some(Measurement {
                detector_id: id.to_string(),
                outcome: None,
                analog_value,
            }),
        }
    }

    #[test]
    fn final_amplitude_beats_any_measurement_sum() {
        let result = SimulationResult {
            run_seed: None,
            node_results: vec![
                readout("det_0", Some(100.0)),
                amplitude("mzi_0", 1.0, 1.0),
                amplitude("out", 3.0, 4.0),
            ],
        };
        assert_abs_diff_eq!(extract_objective(&result), 25.0);
    }

    #[test]
    fn amplitude_free_documents_sum_analog_readouts() {
        let result = SimulationResult {
            run_seed: None,
            node_results: vec![
                readout("det_0", Some(1.0)),
                readout("det_1", None),
                readout("det_2", Some(2.5)),
            ],
        };
        assert_abs_diff_eq!(extract_objective(&result), 3.5);
    }

    #[test]
    fn earlier_amplitudes_do_not_rescue_a_bare_final_record() {
        let result = SimulationResult {
            run_seed: None,
            node_results: vec![amplitude("mzi_0", 2.0, 0.0), readout("det_0", Some(0.5))],
        };
        assert_abs_diff_eq!(extract_objective(&result), 0.5);
    }

    #[test]
    fn empty_documents_reduce_to_zero() {
        assert_abs_diff_eq!(extract_objective(&SimulationResult::default()), 0.0);
    }
}
