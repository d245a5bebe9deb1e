mod error;

pub use error::ModelError;

/// A macro that generates a getter method for any `Copy` field.
///
/// This macro creates a public getter method that returns the value of the
/// specified field. The generated method includes appropriate documentation
/// describing the field being accessed.
///
/// # Parameters
///
/// - `$method_name` - The name of the getter method (e.g., get_hidden_size)
/// - `$field_name` - The name of the field to access (e.g., hidden_size)
/// - `$return_type` - The return type of the getter method
macro_rules! get_field {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name
        }
    };
}

/// Module `math` contains numerically stable activation functions and the
/// small loss helpers shared by the recurrent engine.
///
/// # Core Functions
///
/// - `sigmoid` - Logistic sigmoid saturating outside ±500 to avoid overflow
/// - `stable_tanh` - Hyperbolic tangent with input clamping
/// - `half_squared_error` - Half mean squared error between two vectors
/// - `mean_error` - Mean componentwise difference between two vectors
///
/// # Example
/// ```rust
/// use gatedseq::math::{sigmoid, stable_tanh};
///
/// assert!((sigmoid(0.0_f32) - 0.5).abs() < 1e-6);
/// assert!(stable_tanh(1e9_f32) <= 1.0);
/// ```
pub mod math;

/// A convenience module that re-exports the most commonly used types from
/// this crate.
///
/// # Available Components
///
/// - `SequenceNetwork` - The gated recurrent network facade
/// - `GateBank`, `Gate`, `WeightStats` - Parameter containers
/// - `RecurrentState`, `GateActivations`, `Trajectory` - State and
///   introspection types
/// - `OptimizerKind`, `SGD`, `Adam`, `ParamId` - Optimizer surface
/// - `ModelError` - Library error type
///
/// # Examples
/// ```rust
/// use gatedseq::prelude::*;
///
/// // Quick access to all commonly used components
/// ```
pub mod prelude;

/// Components of the gated recurrent sequence-model engine.
///
/// This module provides an LSTM cell together with the machinery around it:
/// parameter initialization, sequence execution with full trajectory capture,
/// a finite-difference training loop with gradient clipping, pluggable
/// optimizers, and network lifecycle operations.
///
/// # Core Components
///
/// ## Parameters
/// - **Gate** / **GateBank**: the four gate weight matrices and biases over
///   the concatenated `[x, h]` vector plus the linear readout pair,
///   initialized with Glorot/Xavier bounded-uniform values
///
/// ## Execution
/// - **RecurrentState**: the `(hidden, cell)` pair threaded through calls
/// - **cell::step**: the pure LSTM transition function
/// - **Trajectory** / **run_sequence**: ordered sequence execution caching
///   inputs, states, gate activations and outputs for introspection
///
/// ## Training
/// - **SequenceNetwork**: forward/predict, bounded finite-difference
///   training with gradient clipping, loss history, lifecycle operations
/// - **SGD** / **Adam**: optimizers selected by name, with typed per-tensor
///   moment buffers
///
/// # Examples
/// ```rust
/// use gatedseq::prelude::*;
/// use ndarray::array;
///
/// // A 1 -> 4 -> 1 network trained on a shift-by-one task
/// let mut net = SequenceNetwork::new(1, 4, 1, 0.05, OptimizerKind::Sgd).unwrap();
/// let sequence = vec![array![0.1_f32], array![0.2], array![0.3], array![0.4]];
/// let targets = vec![array![0.2_f32], array![0.3], array![0.4], array![0.5]];
///
/// let loss = net.train(&[sequence.clone()], &[targets]).unwrap();
/// let outputs = net.predict(&sequence).unwrap();
/// assert_eq!(outputs.len(), 4);
/// assert!(loss.is_finite());
/// ```
pub mod recurrent;
