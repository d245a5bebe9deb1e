use super::*;

/// Bound for the small uniform initialization of the non-forget gate biases
/// and the readout bias.
const SMALL_INIT_BOUND: f32 = 0.05;

/// Parameters for a single gate of the recurrent cell.
///
/// The kernel operates on the concatenated `[x, h_prev]` vector, so its shape
/// is `(hidden_size, input_size + hidden_size)`; the bias has length
/// `hidden_size`.
///
/// # Fields
///
/// - `kernel` - Weight matrix with shape (hidden_size, input_size + hidden_size)
/// - `bias` - Bias vector with length hidden_size
#[derive(Debug, Clone)]
pub struct Gate {
    pub kernel: Array2<f32>,
    pub bias: Array1<f32>,
}

impl Gate {
    /// Creates a gate with a Glorot-initialized kernel and a constant bias.
    ///
    /// # Parameters
    ///
    /// - `hidden_size` - Number of hidden units
    /// - `combined_size` - Length of the concatenated `[x, h_prev]` vector
    /// - `bias_init_value` - Constant bias value (1.0 for the forget gate)
    fn with_constant_bias(hidden_size: usize, combined_size: usize, bias_init_value: f32) -> Self {
        Self {
            kernel: glorot_uniform(hidden_size, combined_size),
            bias: Array1::from_elem(hidden_size, bias_init_value),
        }
    }

    /// Creates a gate with a Glorot-initialized kernel and a small random bias.
    fn with_random_bias(hidden_size: usize, combined_size: usize) -> Self {
        Self {
            kernel: glorot_uniform(hidden_size, combined_size),
            bias: Array::random(hidden_size, Uniform::new(-SMALL_INIT_BOUND, SMALL_INIT_BOUND)),
        }
    }
}

/// Generates a weight matrix with Xavier/Glorot bounded-uniform values.
///
/// Every entry is drawn uniformly from `±sqrt(6 / (rows + cols))`.
///
/// # Parameters
///
/// - `rows` - Number of rows of the matrix
/// - `cols` - Number of columns of the matrix
///
/// # Returns
///
/// - `Array2<f32>` - The initialized weight matrix
#[inline]
fn glorot_uniform(rows: usize, cols: usize) -> Array2<f32> {
    let limit = (6.0 / (rows + cols) as f32).sqrt();
    Array::random((rows, cols), Uniform::new(-limit, limit))
}

/// Total learnable scalar count of a parameter bank.
///
/// # Fields
///
/// - `count` - Number of learnable scalars across all gates and the readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightStats {
    pub count: usize,
}

/// The complete learnable parameter set of the recurrent network.
///
/// Holds the four gate weight matrices and biases (forget, input, cell
/// candidate, output) together with the linear readout pair. The bank is
/// owned by the network; it is mutated only by the optimizer during training
/// and replaced wholesale by lifecycle rebuilds.
///
/// Initialization follows the usual recurrent-network conventions: all
/// kernels Glorot bounded-uniform, the forget-gate bias all ones so the cell
/// starts out remembering, the remaining biases small random values.
///
/// # Fields
///
/// - `forget` - Gate controlling what to discard from the cell state
/// - `input` - Gate controlling what new information to store
/// - `candidate` - Gate proposing new candidate values for the cell state
/// - `output` - Gate controlling what to expose as the hidden state
/// - `readout_kernel` - Linear readout weights with shape (output_size, hidden_size)
/// - `readout_bias` - Linear readout bias with length output_size
/// - `input_size` - Dimensionality of input vectors
/// - `hidden_size` - Number of hidden units
/// - `output_size` - Dimensionality of output vectors
#[derive(Debug, Clone)]
pub struct GateBank {
    pub forget: Gate,
    pub input: Gate,
    pub candidate: Gate,
    pub output: Gate,
    pub readout_kernel: Array2<f32>,
    pub readout_bias: Array1<f32>,
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
}

impl GateBank {
    /// Creates a bank with freshly initialized parameters.
    ///
    /// # Parameters
    ///
    /// - `input_size` - Dimensionality of input vectors
    /// - `hidden_size` - Number of hidden units
    /// - `output_size` - Dimensionality of output vectors
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new bank with random weights
    /// - `Err(ModelError::InputValidationError)` - If any dimension is 0
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
    ) -> Result<Self, ModelError> {
        validate_dimension_greater_than_zero(input_size, "input_size")?;
        validate_dimension_greater_than_zero(hidden_size, "hidden_size")?;
        validate_dimension_greater_than_zero(output_size, "output_size")?;

        let combined_size = input_size + hidden_size;

        Ok(Self {
            forget: Gate::with_constant_bias(hidden_size, combined_size, 1.0), // forget gate bias = 1.0
            input: Gate::with_random_bias(hidden_size, combined_size),
            candidate: Gate::with_random_bias(hidden_size, combined_size),
            output: Gate::with_random_bias(hidden_size, combined_size),
            readout_kernel: glorot_uniform(output_size, hidden_size),
            readout_bias: Array::random(
                output_size,
                Uniform::new(-SMALL_INIT_BOUND, SMALL_INIT_BOUND),
            ),
            input_size,
            hidden_size,
            output_size,
        })
    }

    get_field!(input_size, input_size, usize);
    get_field!(hidden_size, hidden_size, usize);
    get_field!(output_size, output_size, usize);

    /// Counts the learnable scalars in the bank.
    ///
    /// # Returns
    ///
    /// * `WeightStats` - Total count over the four gates and the readout pair
    pub fn weight_stats(&self) -> WeightStats {
        let combined_size = self.input_size + self.hidden_size;
        let gate_params = 4 * (self.hidden_size * combined_size + self.hidden_size);
        let readout_params = self.output_size * self.hidden_size + self.output_size;
        WeightStats {
            count: gate_params + readout_params,
        }
    }
}
