use super::*;
use crate::math::{half_squared_error, mean_error};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

/// Perturbation used by the finite-difference gradient estimate.
const FD_EPSILON: f32 = 0.001;

/// Side length of the readout-kernel corner that receives a gradient estimate.
const FD_CORNER: usize = 4;

/// Gradient clipping value to prevent exploding updates.
const GRADIENT_CLIP_VALUE: f32 = 5.0;

/// Scale applied to the closed-form gate-bias updates.
const BIAS_NUDGE_SCALE: f32 = 0.01;

/// A gated recurrent sequence network with a finite-difference training loop.
///
/// The network owns its parameter bank, the optimizer, the trajectory of the
/// most recent pass, the loss history and the epoch counter. Parameters are
/// mutated only by training steps and replaced wholesale by lifecycle
/// rebuilds; the trajectory cache is replaced in a single assignment at the
/// end of each pass, so introspection readers never observe a partially
/// updated record.
///
/// Training deliberately avoids backpropagation through time. Each step
/// combines a bounded finite-difference estimate for the readout kernel with
/// closed-form nudges for the output- and input-gate biases; see
/// [`train_step`](Self::train_step) for the exact scheme and its cost.
///
/// # Fields
///
/// - `input_size` - Dimensionality of input vectors
/// - `hidden_size` - Number of hidden units
/// - `output_size` - Dimensionality of output vectors
/// - `learning_rate` - Step size used by the optimizer and the bias nudges
/// - `optimizer_kind` - Which optimizer variant is active
/// - `bank` - The learnable parameters
/// - `optimizer` - The active optimizer instance with its moment state
/// - `trajectory` - Cached record of the most recent pass, if any
/// - `loss_history` - Average loss per epoch, append-only
/// - `epoch` - Number of completed training epochs
///
/// # Example
/// ```rust
/// use gatedseq::prelude::*;
/// use ndarray::array;
///
/// let mut net = SequenceNetwork::new(1, 4, 1, 0.05, OptimizerKind::Sgd).unwrap();
///
/// let sequence = vec![array![0.1_f32], array![0.2], array![0.3], array![0.4]];
/// let targets = vec![array![0.2_f32], array![0.3], array![0.4], array![0.5]];
///
/// // One epoch over a single sequence/target pair
/// let loss = net.train(&[sequence.clone()], &[targets]).unwrap();
/// assert_eq!(net.loss_history().len(), 1);
/// assert!(loss.is_finite());
///
/// // Inference plus introspection of the cached trajectory
/// let outputs = net.predict(&sequence).unwrap();
/// assert_eq!(outputs.len(), 4);
/// assert_eq!(net.last_hidden_states().len(), 5); // initial state included
/// ```
pub struct SequenceNetwork {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    learning_rate: f32,
    optimizer_kind: OptimizerKind,
    bank: GateBank,
    optimizer: Box<dyn Optimizer>,
    trajectory: Option<Trajectory>,
    loss_history: Vec<f32>,
    epoch: usize,
}

impl SequenceNetwork {
    /// Creates a network with freshly initialized parameters.
    ///
    /// # Parameters
    ///
    /// - `input_size` - Dimensionality of input vectors
    /// - `hidden_size` - Number of hidden units
    /// - `output_size` - Dimensionality of output vectors
    /// - `learning_rate` - Step size for parameter updates
    /// - `optimizer` - Which optimizer variant to build
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new network ready for training
    /// - `Err(ModelError::InputValidationError)` - If any dimension is 0 or the learning rate is invalid
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        learning_rate: f32,
        optimizer: OptimizerKind,
    ) -> Result<Self, ModelError> {
        validate_learning_rate(learning_rate)?;
        let bank = GateBank::new(input_size, hidden_size, output_size)?;
        let optimizer_instance = build_optimizer(optimizer, learning_rate)?;

        Ok(Self {
            input_size,
            hidden_size,
            output_size,
            learning_rate,
            optimizer_kind: optimizer,
            bank,
            optimizer: optimizer_instance,
            trajectory: None,
            loss_history: Vec::new(),
            epoch: 0,
        })
    }

    get_field!(input_size, input_size, usize);
    get_field!(hidden_size, hidden_size, usize);
    get_field!(output_size, output_size, usize);
    get_field!(learning_rate, learning_rate, f32);
    get_field!(optimizer_kind, optimizer_kind, OptimizerKind);
    get_field!(epoch, epoch, usize);

    /// Runs the network over a sequence and caches the trajectory.
    ///
    /// Timesteps are processed strictly in order. With `reset_state` the pass
    /// starts from an all-zero state; otherwise it continues from the final
    /// state of the previously cached trajectory (or zeros if none exists).
    ///
    /// # Parameters
    ///
    /// - `sequence` - Ordered input vectors, each with length input_size
    /// - `reset_state` - Whether to start from a fresh zero state
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Array1<f32>>)` - One output vector per timestep
    /// - `Err(ModelError::InputValidationError)` - If any input vector has the wrong length
    pub fn forward(
        &mut self,
        sequence: &[Array1<f32>],
        reset_state: bool,
    ) -> Result<Vec<Array1<f32>>, ModelError> {
        validate_vector_lengths(sequence, self.input_size, "sequence")?;

        let initial = if reset_state {
            RecurrentState::zeros(self.hidden_size)
        } else {
            self.resume_state()
        };

        let trajectory = run_sequence(&self.bank, sequence, initial);
        let outputs = trajectory.outputs.clone();
        self.trajectory = Some(trajectory);

        Ok(outputs)
    }

    /// Runs the network over a sequence from a fresh zero state.
    ///
    /// Equivalent to `forward(sequence, true)`.
    pub fn predict(&mut self, sequence: &[Array1<f32>]) -> Result<Vec<Array1<f32>>, ModelError> {
        self.forward(sequence, true)
    }

    /// Performs one training step on a single sequence/target pair.
    ///
    /// The step runs in a fixed order:
    ///
    /// 1. One full forward pass from a zero state; the base loss is the mean
    ///    over timesteps of `0.5 * mean((output - target)^2)`.
    /// 2. A bounded finite-difference gradient estimate for the readout
    ///    kernel: only the top-left `min(rows, 4) x min(cols, 4)` corner is
    ///    measured, each entry by perturbing it by `0.001` and re-running the
    ///    full sequence. The remaining entries receive no estimate. This is a
    ///    deliberate approximation, not exact backpropagation; the cost grows
    ///    as `O(corner_entries * timesteps * hidden_size^2)`.
    /// 3. Every gradient entry is clipped to ±5.
    /// 4. The clipped gradient is applied to the readout kernel through the
    ///    optimizer.
    /// 5. Closed-form nudges, bypassing the optimizer, adjust the output- and
    ///    input-gate biases by `lr * 0.01 * error_t * gate_t[k]` per timestep.
    ///    The forget-gate and cell-candidate biases are intentionally left
    ///    untouched by this path.
    ///
    /// The trajectory of the unperturbed base pass is cached for
    /// introspection.
    ///
    /// # Parameters
    ///
    /// - `sequence` - Ordered input vectors, each with length input_size
    /// - `targets` - Expected outputs, index-aligned with `sequence`
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - The base loss measured before any parameter update
    /// - `Err(ModelError::InputValidationError)` - If the pair is misaligned, empty, or ill-sized
    pub fn train_step(
        &mut self,
        sequence: &[Array1<f32>],
        targets: &[Array1<f32>],
    ) -> Result<f32, ModelError> {
        validate_aligned_lengths(sequence.len(), targets.len(), "sequence", "targets")?;
        if sequence.is_empty() {
            return Err(ModelError::InputValidationError(
                "sequence must not be empty".to_string(),
            ));
        }
        validate_vector_lengths(sequence, self.input_size, "sequence")?;
        validate_vector_lengths(targets, self.output_size, "targets")?;

        // Base pass and loss
        let trajectory = run_sequence(
            &self.bank,
            sequence,
            RecurrentState::zeros(self.hidden_size),
        );
        let base_loss = sequence_loss(&trajectory.outputs, targets);

        let grad = clip_gradient(self.estimate_readout_gradient(sequence, targets, base_loss));

        self.optimizer.begin_step();
        self.optimizer
            .update(ParamId::ReadoutKernel, &mut self.bank.readout_kernel, &grad);

        self.nudge_gate_biases(&trajectory, targets);

        self.trajectory = Some(trajectory);

        Ok(base_loss)
    }

    /// Trains for one epoch over a batch of sequence/target pairs.
    ///
    /// Pairs are processed strictly in the given order, one `train_step`
    /// each; the average loss is appended to the loss history and the epoch
    /// counter advances by one.
    ///
    /// # Parameters
    ///
    /// - `sequences` - Input sequences
    /// - `targets_list` - Target lists, index-aligned with `sequences`
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - The average loss over the batch
    /// - `Err(ModelError::InputValidationError)` - If the batch is empty or misaligned
    pub fn train(
        &mut self,
        sequences: &[Vec<Array1<f32>>],
        targets_list: &[Vec<Array1<f32>>],
    ) -> Result<f32, ModelError> {
        validate_aligned_lengths(sequences.len(), targets_list.len(), "sequences", "targets_list")?;
        if sequences.is_empty() {
            return Err(ModelError::InputValidationError(
                "sequences must not be empty".to_string(),
            ));
        }

        let mut total_loss = 0.0;
        for (sequence, targets) in sequences.iter().zip(targets_list.iter()) {
            total_loss += self.train_step(sequence, targets)?;
        }

        let average_loss = total_loss / sequences.len() as f32;
        self.loss_history.push(average_loss);
        self.epoch += 1;

        Ok(average_loss)
    }

    /// Trains for multiple epochs with a progress bar.
    ///
    /// Calls [`train`](Self::train) once per epoch on the same batch.
    ///
    /// # Parameters
    ///
    /// - `sequences` - Input sequences
    /// - `targets_list` - Target lists, index-aligned with `sequences`
    /// - `epochs` - Number of training epochs to perform
    ///
    /// # Returns
    ///
    /// - `Ok(&mut Self)` - Mutable reference to self for method chaining
    /// - `Err(ModelError)` - If any epoch fails
    pub fn fit(
        &mut self,
        sequences: &[Vec<Array1<f32>>],
        targets_list: &[Vec<Array1<f32>>],
        epochs: u32,
    ) -> Result<&mut Self, ModelError> {
        // Create progress bar for training epochs
        let progress_bar = ProgressBar::new(epochs as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} | Loss: {msg}")
                .expect("Failed to set progress bar template")
                .progress_chars("█▓░"),
        );

        for _ in 0..epochs {
            let loss_value = self.train(sequences, targets_list)?;

            progress_bar.set_message(format!("{:.6}", loss_value));
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Training completed");

        println!(
            "\nSequence network training completed: {} sequences, {} epochs",
            sequences.len(),
            epochs
        );

        Ok(self)
    }

    /// Discards all learned state and rebuilds the network in place.
    ///
    /// The parameter bank is re-created with fresh random weights at the
    /// current dimensions, the optimizer loses its moment state, the cached
    /// trajectory is dropped, the loss history is emptied and the epoch
    /// counter returns to 0.
    pub fn reinitialize(&mut self) -> Result<(), ModelError> {
        self.bank = GateBank::new(self.input_size, self.hidden_size, self.output_size)?;
        self.optimizer = build_optimizer(self.optimizer_kind, self.learning_rate)?;
        self.trajectory = None;
        self.loss_history.clear();
        self.epoch = 0;
        Ok(())
    }

    /// Changes the hidden width by fully rebuilding the network.
    ///
    /// Equivalent to a [`reinitialize`](Self::reinitialize) at the new
    /// dimension; existing weights are never resized or padded in place.
    pub fn set_hidden_size(&mut self, hidden_size: usize) -> Result<(), ModelError> {
        validate_dimension_greater_than_zero(hidden_size, "hidden_size")?;
        self.hidden_size = hidden_size;
        self.reinitialize()
    }

    /// Changes the learning rate, rebuilding only the optimizer.
    ///
    /// The parameter bank is preserved; any optimizer moment state is
    /// discarded.
    pub fn set_learning_rate(&mut self, learning_rate: f32) -> Result<(), ModelError> {
        validate_learning_rate(learning_rate)?;
        self.learning_rate = learning_rate;
        self.optimizer = build_optimizer(self.optimizer_kind, learning_rate)?;
        Ok(())
    }

    /// Switches the optimizer by name, rebuilding only the optimizer.
    ///
    /// The parameter bank is preserved; any moment state of the previous
    /// optimizer is discarded.
    ///
    /// # Parameters
    ///
    /// * `name` - `"sgd"` or `"adam"`, case-insensitive
    pub fn set_optimizer(&mut self, name: &str) -> Result<(), ModelError> {
        let kind = OptimizerKind::from_name(name)?;
        self.optimizer_kind = kind;
        self.optimizer = build_optimizer(kind, self.learning_rate)?;
        Ok(())
    }

    /// Average loss per epoch, append-only.
    pub fn loss_history(&self) -> &[f32] {
        &self.loss_history
    }

    /// Input vectors of the most recent pass, one per timestep.
    pub fn last_inputs(&self) -> &[Array1<f32>] {
        self.trajectory
            .as_ref()
            .map(|t| t.inputs.as_slice())
            .unwrap_or(&[])
    }

    /// Hidden states of the most recent pass, initial state included.
    pub fn last_hidden_states(&self) -> &[Array1<f32>] {
        self.trajectory
            .as_ref()
            .map(|t| t.hidden_states.as_slice())
            .unwrap_or(&[])
    }

    /// Cell states of the most recent pass, initial state included.
    pub fn last_cell_states(&self) -> &[Array1<f32>] {
        self.trajectory
            .as_ref()
            .map(|t| t.cell_states.as_slice())
            .unwrap_or(&[])
    }

    /// Gate activations of the most recent pass, one record per timestep.
    pub fn last_gates(&self) -> &[GateActivations] {
        self.trajectory
            .as_ref()
            .map(|t| t.gates.as_slice())
            .unwrap_or(&[])
    }

    /// Outputs of the most recent pass, one per timestep.
    pub fn last_outputs(&self) -> &[Array1<f32>] {
        self.trajectory
            .as_ref()
            .map(|t| t.outputs.as_slice())
            .unwrap_or(&[])
    }

    /// Total learnable scalar count of the current parameter bank.
    pub fn weight_stats(&self) -> WeightStats {
        self.bank.weight_stats()
    }

    /// Read access to the parameter bank.
    pub fn bank(&self) -> &GateBank {
        &self.bank
    }

    /// Direct access to the parameter bank, for weight surgery.
    pub fn bank_mut(&mut self) -> &mut GateBank {
        &mut self.bank
    }

    /// State to resume from when a pass does not reset.
    fn resume_state(&self) -> RecurrentState {
        match &self.trajectory {
            Some(trajectory) => trajectory.final_state(),
            None => RecurrentState::zeros(self.hidden_size),
        }
    }

    /// Measures the finite-difference gradient over the readout-kernel corner.
    ///
    /// Every measured entry perturbs its own clone of the bank and re-runs
    /// the full sequence, so the scan is deterministic however the work is
    /// scheduled; entries outside the corner stay zero.
    fn estimate_readout_gradient(
        &self,
        sequence: &[Array1<f32>],
        targets: &[Array1<f32>],
        base_loss: f32,
    ) -> Array2<f32> {
        let (rows, cols) = self.bank.readout_kernel.dim();
        let mut grad = Array2::zeros((rows, cols));

        let entries: Vec<(usize, usize)> = (0..rows.min(FD_CORNER))
            .flat_map(|i| (0..cols.min(FD_CORNER)).map(move |j| (i, j)))
            .collect();

        let bank = &self.bank;
        let hidden_size = self.hidden_size;

        let estimates: Vec<((usize, usize), f32)> = entries
            .into_par_iter()
            .map(|(i, j)| {
                let mut perturbed = bank.clone();
                perturbed.readout_kernel[[i, j]] += FD_EPSILON;

                let trajectory =
                    run_sequence(&perturbed, sequence, RecurrentState::zeros(hidden_size));
                let loss = sequence_loss(&trajectory.outputs, targets);

                ((i, j), (loss - base_loss) / FD_EPSILON)
            })
            .collect();

        for ((i, j), estimate) in estimates {
            grad[[i, j]] = estimate;
        }

        grad
    }

    /// Applies the closed-form bias updates for one cached pass.
    fn nudge_gate_biases(&mut self, trajectory: &Trajectory, targets: &[Array1<f32>]) {
        let scale = self.learning_rate * BIAS_NUDGE_SCALE;

        for (t, target) in targets.iter().enumerate() {
            let error = mean_error(trajectory.outputs[t].view(), target.view());
            let gates = &trajectory.gates[t];

            self.bank.output.bias = &self.bank.output.bias - &(scale * error * &gates.output);
            self.bank.input.bias = &self.bank.input.bias - &(scale * error * &gates.input);
        }
    }
}

/// Mean over timesteps of the half squared error.
fn sequence_loss(outputs: &[Array1<f32>], targets: &[Array1<f32>]) -> f32 {
    let total: f32 = outputs
        .iter()
        .zip(targets.iter())
        .map(|(output, target)| half_squared_error(output.view(), target.view()))
        .sum();
    total / outputs.len() as f32
}

/// Clips every gradient entry to ±`GRADIENT_CLIP_VALUE`.
pub(crate) fn clip_gradient(mut grad: Array2<f32>) -> Array2<f32> {
    grad.mapv_inplace(|g| g.clamp(-GRADIENT_CLIP_VALUE, GRADIENT_CLIP_VALUE));
    grad
}
