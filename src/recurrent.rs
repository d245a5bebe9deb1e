/// The pure LSTM transition function and its state types
pub mod cell;
/// Gate parameter containers and Glorot initialization
pub mod gate;
/// Input validation functions for the recurrent engine
mod input_validation_function;
/// The trainable sequence network facade
pub mod network;
/// Optimization algorithms for the training loop
pub mod optimizer;
/// Ordered sequence execution with trajectory capture
pub mod runner;

pub use cell::{CellStep, GateActivations, RecurrentState};
pub use gate::{Gate, GateBank, WeightStats};
pub use network::SequenceNetwork;
pub use optimizer::{Adam, Optimizer, OptimizerKind, ParamId, SGD, build_optimizer};
pub use runner::{Trajectory, run_sequence};

use crate::ModelError;
use crate::math::{sigmoid, stable_tanh};
use input_validation_function::*;
use ndarray::{Array, Array1, Array2, s};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
