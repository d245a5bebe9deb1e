pub use crate::ModelError;
pub use crate::math::{half_squared_error, mean_error, sigmoid, stable_tanh};
pub use crate::recurrent::{
    Adam, CellStep, Gate, GateActivations, GateBank, Optimizer, OptimizerKind, ParamId,
    RecurrentState, SGD, SequenceNetwork, Trajectory, WeightStats, build_optimizer, run_sequence,
};
