use super::*;
use crate::recurrent::network::clip_gradient;

fn ramp_sequence(timesteps: usize, width: usize) -> Vec<Array1<f32>> {
    (0..timesteps)
        .map(|t| Array1::from_elem(width, 0.1 * (t as f32 + 1.0)))
        .collect()
}

#[test]
fn test_forward_output_count_and_width() {
    let mut net = SequenceNetwork::new(2, 3, 2, 0.01, OptimizerKind::Sgd).unwrap();
    let sequence = ramp_sequence(4, 2);

    let outputs = net.forward(&sequence, true).unwrap();

    assert_eq!(outputs.len(), 4);
    assert!(outputs.iter().all(|y| y.len() == 2));

    // Trajectory conventions: states carry the initial entry, the rest are per-timestep
    assert_eq!(net.last_hidden_states().len(), 5);
    assert_eq!(net.last_cell_states().len(), 5);
    assert_eq!(net.last_gates().len(), 4);
    assert_eq!(net.last_outputs().len(), 4);
    assert_eq!(net.last_inputs().len(), 4);
}

#[test]
fn test_forward_is_deterministic_with_reset() {
    let mut net = SequenceNetwork::new(1, 4, 1, 0.01, OptimizerKind::Sgd).unwrap();
    let sequence = ramp_sequence(5, 1);

    let first = net.predict(&sequence).unwrap();
    let second = net.predict(&sequence).unwrap();

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a, b);
    }
}

#[test]
fn test_forward_continues_state_without_reset() {
    let mut net = SequenceNetwork::new(1, 3, 1, 0.01, OptimizerKind::Sgd).unwrap();
    let sequence = ramp_sequence(3, 1);

    net.predict(&sequence).unwrap();
    let carried = net.last_hidden_states().last().unwrap().clone();

    net.forward(&sequence, false).unwrap();
    assert_eq!(net.last_hidden_states()[0], carried);
}

#[test]
fn test_forward_rejects_wrong_input_width() {
    let mut net = SequenceNetwork::new(2, 3, 1, 0.01, OptimizerKind::Sgd).unwrap();
    let sequence = ramp_sequence(3, 5);

    assert!(net.forward(&sequence, true).is_err());
}

#[test]
fn test_train_step_rejects_invalid_pairs() {
    let mut net = SequenceNetwork::new(1, 3, 1, 0.01, OptimizerKind::Sgd).unwrap();
    let sequence = ramp_sequence(4, 1);
    let targets = ramp_sequence(3, 1);

    // Misaligned lengths
    assert!(net.train_step(&sequence, &targets).is_err());

    // Empty pair
    assert!(net.train_step(&[], &[]).is_err());

    // Targets with the wrong width
    let wide_targets = ramp_sequence(4, 2);
    assert!(net.train_step(&sequence, &wide_targets).is_err());
}

#[test]
fn test_train_rejects_misaligned_batches() {
    let mut net = SequenceNetwork::new(1, 3, 1, 0.01, OptimizerKind::Sgd).unwrap();
    let sequences = vec![ramp_sequence(4, 1)];

    assert!(net.train(&sequences, &[]).is_err());
    assert!(net.train(&[], &[]).is_err());
}

#[test]
fn test_clip_gradient_limits_entries() {
    let clipped = clip_gradient(array![[10.0_f32, -7.0, 3.0]]);
    assert_relative_eq!(clipped[[0, 0]], 5.0, epsilon = 1e-6);
    assert_relative_eq!(clipped[[0, 1]], -5.0, epsilon = 1e-6);
    assert_relative_eq!(clipped[[0, 2]], 3.0, epsilon = 1e-6);
}

#[test]
fn test_large_raw_gradient_applies_as_exactly_clip_value() {
    // Engineer a raw finite-difference gradient far beyond the clip bound:
    // zeroed kernels with fixed biases make the hidden state predictable,
    // and an extreme target makes the loss slope huge.
    let mut net = SequenceNetwork::new(1, 1, 1, 0.1, OptimizerKind::Sgd).unwrap();
    {
        let bank = net.bank_mut();
        bank.forget.kernel.fill(0.0);
        bank.input.kernel.fill(0.0);
        bank.candidate.kernel.fill(0.0);
        bank.output.kernel.fill(0.0);
        bank.input.bias.fill(0.0); // input gate = 0.5
        bank.candidate.bias.fill(1.0); // candidate = tanh(1)
        bank.output.bias.fill(0.0); // output gate = 0.5
        bank.readout_kernel.fill(0.0);
        bank.readout_bias.fill(0.0);
    }

    let sequence = vec![array![0.0_f32]];
    let targets = vec![array![1000.0_f32]];

    net.train_step(&sequence, &targets).unwrap();

    // The raw estimate is roughly -1000 * h (h ≈ 0.18), clipped to -5,
    // so SGD moves the perturbed entry by exactly +lr * 5
    assert_relative_eq!(net.bank().readout_kernel[[0, 0]], 0.5, epsilon = 1e-4);
}

#[test]
fn test_train_appends_history_and_advances_epoch() {
    let mut net = SequenceNetwork::new(1, 4, 1, 0.05, OptimizerKind::Sgd).unwrap();
    let sequences = vec![ramp_sequence(4, 1)];
    let targets_list = vec![ramp_sequence(4, 1)];

    assert_eq!(net.epoch(), 0);
    assert!(net.loss_history().is_empty());

    let loss = net.train(&sequences, &targets_list).unwrap();

    assert!(loss.is_finite());
    assert_eq!(net.epoch(), 1);
    assert_eq!(net.loss_history(), &[loss]);
}

#[test]
fn test_reinitialize_resets_learning_state() {
    let mut net = SequenceNetwork::new(1, 4, 1, 0.05, OptimizerKind::Adam).unwrap();
    let sequences = vec![ramp_sequence(4, 1)];
    let targets_list = vec![ramp_sequence(4, 1)];

    net.train(&sequences, &targets_list).unwrap();
    net.reinitialize().unwrap();

    assert_eq!(net.epoch(), 0);
    assert!(net.loss_history().is_empty());
    assert!(net.last_outputs().is_empty());
    assert!(net.last_hidden_states().is_empty());
}

#[test]
fn test_set_hidden_size_rebuilds_everything() {
    let mut net = SequenceNetwork::new(2, 4, 1, 0.05, OptimizerKind::Sgd).unwrap();
    let sequences = vec![ramp_sequence(3, 2)];
    let targets_list = vec![ramp_sequence(3, 1)];
    net.train(&sequences, &targets_list).unwrap();

    net.set_hidden_size(8).unwrap();

    assert_eq!(net.hidden_size(), 8);
    assert_eq!(net.bank().forget.kernel.shape(), &[8, 10]);
    assert!(net.loss_history().is_empty());
    assert_eq!(net.epoch(), 0);

    assert!(net.set_hidden_size(0).is_err());
}

#[test]
fn test_set_learning_rate_preserves_weights() {
    let mut net = SequenceNetwork::new(1, 4, 1, 0.05, OptimizerKind::Sgd).unwrap();
    let kernel_before = net.bank().readout_kernel.clone();

    net.set_learning_rate(0.2).unwrap();

    assert_relative_eq!(net.learning_rate(), 0.2, epsilon = 1e-6);
    assert_eq!(net.bank().readout_kernel, kernel_before);

    assert!(net.set_learning_rate(0.0).is_err());
}

#[test]
fn test_set_optimizer_preserves_weights() {
    let mut net = SequenceNetwork::new(1, 4, 1, 0.05, OptimizerKind::Sgd).unwrap();
    let kernel_before = net.bank().readout_kernel.clone();

    net.set_optimizer("adam").unwrap();

    assert_eq!(net.optimizer_kind(), OptimizerKind::Adam);
    assert_eq!(net.bank().readout_kernel, kernel_before);

    assert!(net.set_optimizer("momentum").is_err());
}

#[test]
fn test_weight_stats_exposed_on_network() {
    let net = SequenceNetwork::new(1, 4, 1, 0.05, OptimizerKind::Sgd).unwrap();
    // 4 gates of 4x5 weights + 4 biases, plus a 1x4 readout and 1 bias
    assert_eq!(net.weight_stats().count, 4 * (4 * 5 + 4) + (4 + 1));
}
