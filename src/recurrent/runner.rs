use super::*;

/// The cached record of one full sequence pass.
///
/// The state vectors follow the usual caching convention: `hidden_states`
/// and `cell_states` have one entry more than the sequence length because the
/// initial state is stored at index 0. `inputs`, `gates` and `outputs` have
/// exactly one entry per timestep.
///
/// A trajectory is built completely by `run_sequence` and then swapped into
/// the network in a single assignment, so readers never observe a partially
/// filled cache.
///
/// # Fields
///
/// - `inputs` - Input vectors as consumed, one per timestep
/// - `hidden_states` - Hidden states, length = timesteps + 1
/// - `cell_states` - Cell states, length = timesteps + 1
/// - `gates` - Gate activations, one record per timestep
/// - `outputs` - Readout outputs, one per timestep
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub inputs: Vec<Array1<f32>>,
    pub hidden_states: Vec<Array1<f32>>,
    pub cell_states: Vec<Array1<f32>>,
    pub gates: Vec<GateActivations>,
    pub outputs: Vec<Array1<f32>>,
}

impl Trajectory {
    /// Number of timesteps recorded in the trajectory.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Returns true if the trajectory records no timesteps.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// The state after the last recorded timestep.
    ///
    /// # Returns
    ///
    /// * `RecurrentState` - Clone of the final (hidden, cell) pair
    pub fn final_state(&self) -> RecurrentState {
        RecurrentState {
            hidden: self.hidden_states[self.hidden_states.len() - 1].clone(),
            cell: self.cell_states[self.cell_states.len() - 1].clone(),
        }
    }
}

/// Drives the cell across an ordered sequence, threading state.
///
/// Timesteps are processed strictly in order since each step depends on the
/// previous step's state; there is no intra-sequence parallelism. The full
/// trajectory (inputs, states including the initial one, gate activations,
/// outputs) is accumulated for introspection and gradient estimation.
///
/// # Parameters
///
/// - `bank` - The parameter bank to evaluate
/// - `sequence` - Ordered input vectors, each with length input_size
/// - `initial` - State to start from (all zeros for a reset pass)
///
/// # Returns
///
/// * `Trajectory` - The complete record of the pass
pub fn run_sequence(
    bank: &GateBank,
    sequence: &[Array1<f32>],
    initial: RecurrentState,
) -> Trajectory {
    let timesteps = sequence.len();

    let mut inputs = Vec::with_capacity(timesteps);
    let mut hidden_states = Vec::with_capacity(timesteps + 1);
    let mut cell_states = Vec::with_capacity(timesteps + 1);
    let mut gates = Vec::with_capacity(timesteps);
    let mut outputs = Vec::with_capacity(timesteps);

    hidden_states.push(initial.hidden.clone());
    cell_states.push(initial.cell.clone());

    let mut state = initial;

    for x in sequence {
        let step = cell::step(bank, x, &state);

        inputs.push(x.clone());
        hidden_states.push(step.state.hidden.clone());
        cell_states.push(step.state.cell.clone());
        gates.push(step.gates);
        outputs.push(step.output);

        state = step.state;
    }

    Trajectory {
        inputs,
        hidden_states,
        cell_states,
        gates,
        outputs,
    }
}
