use super::*;

#[test]
fn test_gate_bank_shapes() {
    let bank = GateBank::new(3, 5, 2).unwrap();
    let combined = 3 + 5;

    // Gate kernels operate on the concatenated [x, h] vector
    assert_eq!(bank.forget.kernel.shape(), &[5, combined]);
    assert_eq!(bank.input.kernel.shape(), &[5, combined]);
    assert_eq!(bank.candidate.kernel.shape(), &[5, combined]);
    assert_eq!(bank.output.kernel.shape(), &[5, combined]);

    assert_eq!(bank.forget.bias.len(), 5);
    assert_eq!(bank.input.bias.len(), 5);
    assert_eq!(bank.candidate.bias.len(), 5);
    assert_eq!(bank.output.bias.len(), 5);

    // Linear readout pair
    assert_eq!(bank.readout_kernel.shape(), &[2, 5]);
    assert_eq!(bank.readout_bias.len(), 2);
}

#[test]
fn test_gate_bank_rejects_zero_dimensions() {
    assert!(GateBank::new(0, 4, 1).is_err());
    assert!(GateBank::new(2, 0, 1).is_err());
    assert!(GateBank::new(2, 4, 0).is_err());
}

#[test]
fn test_glorot_initialization_bounds() {
    let bank = GateBank::new(3, 5, 2).unwrap();

    // Gate kernels: limit = sqrt(6 / (rows + cols)) with rows=5, cols=8
    let gate_limit = (6.0_f32 / (5 + 8) as f32).sqrt();
    for kernel in [
        &bank.forget.kernel,
        &bank.input.kernel,
        &bank.candidate.kernel,
        &bank.output.kernel,
    ] {
        assert!(kernel.iter().all(|w| w.abs() <= gate_limit));
    }

    // Readout kernel: rows=2, cols=5
    let readout_limit = (6.0_f32 / (2 + 5) as f32).sqrt();
    assert!(bank.readout_kernel.iter().all(|w| w.abs() <= readout_limit));
}

#[test]
fn test_forget_bias_initialized_to_ones() {
    let bank = GateBank::new(2, 6, 1).unwrap();
    assert!(bank.forget.bias.iter().all(|&b| b == 1.0));
}

#[test]
fn test_other_biases_initialized_small() {
    let bank = GateBank::new(2, 6, 1).unwrap();
    for bias in [&bank.input.bias, &bank.candidate.bias, &bank.output.bias] {
        assert!(bias.iter().all(|b| b.abs() <= 0.05));
    }
    assert!(bank.readout_bias.iter().all(|b| b.abs() <= 0.05));
}

#[test]
fn test_weight_stats_count() {
    // 4 gates of 5x(3+5) weights + 5 biases, plus a 2x5 readout and 2 biases
    let bank = GateBank::new(3, 5, 2).unwrap();
    let expected = 4 * (5 * 8 + 5) + (2 * 5 + 2);
    assert_eq!(bank.weight_stats(), WeightStats { count: expected });
}
