use super::*;

/// The two recurrent memory vectors carried across timesteps.
///
/// The state is an explicit value owned by the caller and threaded through
/// `step` calls; a fresh all-zero state starts every reset sequence.
///
/// # Fields
///
/// - `hidden` - Short-term memory vector with length hidden_size
/// - `cell` - Long-term memory vector with length hidden_size
#[derive(Debug, Clone)]
pub struct RecurrentState {
    pub hidden: Array1<f32>,
    pub cell: Array1<f32>,
}

impl RecurrentState {
    /// Creates an all-zero state for the given hidden width.
    ///
    /// # Parameters
    ///
    /// * `hidden_size` - Number of hidden units
    ///
    /// # Returns
    ///
    /// * `RecurrentState` - Zero hidden and cell vectors
    pub fn zeros(hidden_size: usize) -> Self {
        Self {
            hidden: Array1::zeros(hidden_size),
            cell: Array1::zeros(hidden_size),
        }
    }
}

/// Gate activations produced at a single timestep.
///
/// The sigmoid gates (`forget`, `input`, `output`) lie in (0, 1); the tanh
/// `candidate` lies in (-1, 1).
///
/// # Fields
///
/// - `forget` - Forget gate activation
/// - `input` - Input gate activation
/// - `output` - Output gate activation
/// - `candidate` - Cell candidate activation
#[derive(Debug, Clone)]
pub struct GateActivations {
    pub forget: Array1<f32>,
    pub input: Array1<f32>,
    pub output: Array1<f32>,
    pub candidate: Array1<f32>,
}

/// The result of one cell transition.
///
/// # Fields
///
/// - `state` - The next (hidden, cell) state pair
/// - `output` - Linear readout of the new hidden state, length output_size
/// - `gates` - Gate activations computed for this step
#[derive(Debug, Clone)]
pub struct CellStep {
    pub state: RecurrentState,
    pub output: Array1<f32>,
    pub gates: GateActivations,
}

/// Performs one LSTM transition.
///
/// Concatenates the input with the previous hidden state and computes,
/// elementwise over the hidden units:
///
/// 1. f_t = σ(W_f · \[x_t, h_{t-1}\] + b_f)  (Forget gate)
/// 2. i_t = σ(W_i · \[x_t, h_{t-1}\] + b_i)  (Input gate)
/// 3. c̃_t = tanh(W_c · \[x_t, h_{t-1}\] + b_c)  (Cell candidate)
/// 4. c_t = f_t ⊙ c_{t-1} + i_t ⊙ c̃_t  (Cell state update)
/// 5. o_t = σ(W_o · \[x_t, h_{t-1}\] + b_o)  (Output gate)
/// 6. h_t = o_t ⊙ tanh(c_t)  (Hidden state update)
/// 7. y_t = W_y · h_t + b_y  (Linear readout, no nonlinearity)
///
/// Where σ is the sigmoid function and ⊙ is element-wise multiplication.
/// Activation arguments saturate outside ±500 for numerical stability.
///
/// This is a pure function: the caller owns the state and the bank is only
/// read.
///
/// # Parameters
///
/// - `bank` - The parameter bank to evaluate
/// - `x` - Input vector with length input_size
/// - `prev` - Previous state, both vectors with length hidden_size
///
/// # Returns
///
/// * `CellStep` - The next state, the readout output, and the gate activations
pub fn step(bank: &GateBank, x: &Array1<f32>, prev: &RecurrentState) -> CellStep {
    let combined = concat_input_hidden(x, &prev.hidden);

    let forget = gate_activation(&bank.forget, &combined, sigmoid);
    let input = gate_activation(&bank.input, &combined, sigmoid);
    let candidate = gate_activation(&bank.candidate, &combined, stable_tanh);

    // c_t = f_t * c_prev + i_t * candidate
    let cell = &forget * &prev.cell + &input * &candidate;

    let output_gate = gate_activation(&bank.output, &combined, sigmoid);

    // h_t = o_t * tanh(c_t)
    let hidden = &output_gate * &cell.mapv(stable_tanh);

    // Linear readout of the new hidden state
    let output = bank.readout_kernel.dot(&hidden) + &bank.readout_bias;

    CellStep {
        state: RecurrentState { hidden, cell },
        output,
        gates: GateActivations {
            forget,
            input,
            output: output_gate,
            candidate,
        },
    }
}

/// Computes one gate: activation(kernel · combined + bias)
#[inline]
fn gate_activation(
    gate: &Gate,
    combined: &Array1<f32>,
    activation: fn(f32) -> f32,
) -> Array1<f32> {
    (gate.kernel.dot(combined) + &gate.bias).mapv(activation)
}

/// Concatenates the input vector with the previous hidden state.
#[inline]
fn concat_input_hidden(x: &Array1<f32>, hidden: &Array1<f32>) -> Array1<f32> {
    let mut combined = Array1::zeros(x.len() + hidden.len());
    combined.slice_mut(s![..x.len()]).assign(x);
    combined.slice_mut(s![x.len()..]).assign(hidden);
    combined
}
