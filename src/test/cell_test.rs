use super::*;
use crate::recurrent::cell;

#[test]
fn test_step_output_shapes() {
    let bank = GateBank::new(2, 6, 3).unwrap();
    let x = array![0.4_f32, -0.2];
    let state = RecurrentState::zeros(6);

    let step = cell::step(&bank, &x, &state);

    assert_eq!(step.state.hidden.len(), 6);
    assert_eq!(step.state.cell.len(), 6);
    assert_eq!(step.output.len(), 3);
    assert_eq!(step.gates.forget.len(), 6);
    assert_eq!(step.gates.input.len(), 6);
    assert_eq!(step.gates.output.len(), 6);
    assert_eq!(step.gates.candidate.len(), 6);
}

#[test]
fn test_gate_activation_bounds() {
    let bank = GateBank::new(2, 6, 1).unwrap();
    let x = array![3.0_f32, -7.5];
    let state = RecurrentState::zeros(6);

    let step = cell::step(&bank, &x, &state);

    // Sigmoid gates lie in (0, 1)
    for gate in [&step.gates.forget, &step.gates.input, &step.gates.output] {
        assert!(gate.iter().all(|&g| g > 0.0 && g < 1.0));
    }

    // Tanh-activated values lie in (-1, 1)
    assert!(step.gates.candidate.iter().all(|&g| g > -1.0 && g < 1.0));
    assert!(step.state.hidden.iter().all(|&h| h > -1.0 && h < 1.0));
}

#[test]
fn test_step_is_deterministic() {
    let bank = GateBank::new(3, 4, 2).unwrap();
    let x = array![0.1_f32, 0.2, 0.3];
    let state = RecurrentState::zeros(4);

    let first = cell::step(&bank, &x, &state);
    let second = cell::step(&bank, &x, &state);

    assert_eq!(first.state.hidden, second.state.hidden);
    assert_eq!(first.state.cell, second.state.cell);
    assert_eq!(first.output, second.output);
}

#[test]
fn test_forget_bias_effect_at_first_step() {
    // With zeroed kernels the gates reduce to their biases: the forget
    // contribution is f * 0 = 0, so the first cell state is
    // sigmoid(b_i) * tanh(b_c).
    let mut bank = GateBank::new(1, 4, 1).unwrap();
    bank.forget.kernel.fill(0.0);
    bank.input.kernel.fill(0.0);
    bank.candidate.kernel.fill(0.0);
    bank.output.kernel.fill(0.0);

    let x = array![0.3_f32];
    let state = RecurrentState::zeros(4);
    let step = cell::step(&bank, &x, &state);

    // Forget gate is sigmoid(1.0) on every unit
    let expected_forget = 1.0 / (1.0 + (-1.0_f32).exp());
    for &f in step.gates.forget.iter() {
        assert_relative_eq!(f, expected_forget, epsilon = 1e-6);
    }

    // The initial cell state is not the zero vector once default biases apply
    assert!(step.state.cell.iter().any(|&c| c != 0.0));

    for k in 0..4 {
        let expected = sigmoid(bank.input.bias[k]) * bank.candidate.bias[k].tanh();
        assert_relative_eq!(step.state.cell[k], expected, epsilon = 1e-6);
    }
}

#[test]
fn test_state_is_threaded_not_mutated() {
    let bank = GateBank::new(2, 4, 1).unwrap();
    let x = array![0.5_f32, 0.5];
    let state = RecurrentState::zeros(4);

    let _ = cell::step(&bank, &x, &state);

    // The caller's state is untouched by the transition
    assert!(state.hidden.iter().all(|&h| h == 0.0));
    assert!(state.cell.iter().all(|&c| c == 0.0));
}
