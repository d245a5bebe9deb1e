use super::*;
use ahash::AHashMap;

/// Identifies a parameter tensor of the bank.
///
/// Optimizer moment buffers are keyed by this tag, one variant per learnable
/// tensor, so buffers can never be attached to a misspelled parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    ForgetKernel,
    ForgetBias,
    InputKernel,
    InputBias,
    CandidateKernel,
    CandidateBias,
    OutputKernel,
    OutputBias,
    ReadoutKernel,
    ReadoutBias,
}

/// The optimizer variants supported by the training loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerKind {
    Sgd,
    Adam,
}

impl OptimizerKind {
    /// Resolves an optimizer by its (case-insensitive) name.
    ///
    /// # Parameters
    ///
    /// * `name` - `"sgd"` or `"adam"`
    ///
    /// # Returns
    ///
    /// - `Ok(OptimizerKind)` - The matching variant
    /// - `Err(ModelError::InputValidationError)` - If the name is unknown
    pub fn from_name(name: &str) -> Result<Self, ModelError> {
        match name.trim().to_lowercase().as_str() {
            "sgd" => Ok(OptimizerKind::Sgd),
            "adam" => Ok(OptimizerKind::Adam),
            other => Err(ModelError::InputValidationError(format!(
                "unknown optimizer name: {}",
                other
            ))),
        }
    }

    /// Returns the canonical name of the variant.
    pub fn name(&self) -> &'static str {
        match self {
            OptimizerKind::Sgd => "sgd",
            OptimizerKind::Adam => "adam",
        }
    }
}

/// Defines the interface for optimizers used by the training loop.
///
/// An optimizer owns whatever per-parameter state it needs, keyed by
/// `ParamId`. `begin_step` is called exactly once per training step, before
/// any `update` calls of that step, so stateful optimizers share a single
/// step counter across all parameters.
pub trait Optimizer {
    /// Marks the beginning of a training step.
    fn begin_step(&mut self) {}

    /// Applies a gradient to a parameter matrix in place.
    ///
    /// # Parameters
    ///
    /// - `id` - The tensor being updated, used to key persistent state
    /// - `param` - The parameter matrix to update
    /// - `grad` - The gradient, same shape as `param`
    fn update(&mut self, id: ParamId, param: &mut Array2<f32>, grad: &Array2<f32>);

    /// Returns which optimizer variant this is.
    fn kind(&self) -> OptimizerKind;
}

/// Stochastic Gradient Descent (SGD) optimizer.
///
/// A simple optimization algorithm that updates parameters in the direction
/// of the negative gradient, scaled by the learning rate. Keeps no persistent
/// state.
///
/// # Fields
///
/// * `learning_rate` - Learning rate controlling the size of parameter updates
pub struct SGD {
    learning_rate: f32,
}

impl SGD {
    /// Creates a new SGD optimizer with the specified learning rate.
    ///
    /// # Parameters
    ///
    /// * `learning_rate` - Step size for parameter updates
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new SGD optimizer instance
    /// - `Err(ModelError::InputValidationError)` - If the learning rate is not positive and finite
    pub fn new(learning_rate: f32) -> Result<Self, ModelError> {
        validate_learning_rate(learning_rate)?;
        Ok(Self { learning_rate })
    }
}

impl Optimizer for SGD {
    fn update(&mut self, _id: ParamId, param: &mut Array2<f32>, grad: &Array2<f32>) {
        *param = &*param - &(self.learning_rate * grad);
    }

    fn kind(&self) -> OptimizerKind {
        OptimizerKind::Sgd
    }
}

/// First and second moment buffers for a single parameter tensor.
///
/// # Fields
///
/// - `m` - First moment (moving average of gradients)
/// - `v` - Second moment (moving average of squared gradients)
#[derive(Debug, Clone)]
pub struct AdamStates {
    pub m: Array2<f32>,
    pub v: Array2<f32>,
}

impl AdamStates {
    /// Creates zero-initialized moment buffers of the given shape.
    fn new(dim: ndarray::Ix2) -> Self {
        Self {
            m: Array2::zeros(dim),
            v: Array2::zeros(dim),
        }
    }
}

/// Adam optimizer implementation.
///
/// An optimization algorithm that computes individual adaptive learning
/// rates for different parameters from bias-corrected estimates of first and
/// second moments of the gradients. Moment buffers are allocated lazily per
/// `ParamId`; the step counter is shared across all parameters and advances
/// once per training step, not once per parameter.
///
/// # Fields
///
/// - `learning_rate` - Learning rate controlling the size of parameter updates
/// - `beta1` - Exponential decay rate for the first moment estimates
/// - `beta2` - Exponential decay rate for the second moment estimates
/// - `epsilon` - Small constant added for numerical stability
/// - `t` - Current training step, used for bias correction
/// - `moments` - Per-tensor moment buffers keyed by `ParamId`
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: u64,
    moments: AHashMap<ParamId, AdamStates>,
}

impl Adam {
    /// Creates a new Adam optimizer with the specified parameters.
    ///
    /// # Parameters
    ///
    /// - `learning_rate` - Step size for parameter updates
    /// - `beta1` - Decay rate for the first moment estimates (typically 0.9)
    /// - `beta2` - Decay rate for the second moment estimates (typically 0.999)
    /// - `epsilon` - Small constant for numerical stability (typically 1e-8)
    ///
    /// # Returns
    ///
    /// - `Ok(Self)` - A new Adam optimizer instance
    /// - `Err(ModelError::InputValidationError)` - If any hyperparameter is out of range
    pub fn new(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Result<Self, ModelError> {
        validate_learning_rate(learning_rate)?;
        validate_decay_rate(beta1, "beta1")?;
        validate_decay_rate(beta2, "beta2")?;
        if epsilon <= 0.0 || !epsilon.is_finite() {
            return Err(ModelError::InputValidationError(format!(
                "epsilon must be positive and finite, got {}",
                epsilon
            )));
        }

        Ok(Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            t: 0,
            moments: AHashMap::new(),
        })
    }

    /// Creates an Adam optimizer with the conventional default decay rates.
    ///
    /// Equivalent to `Adam::new(learning_rate, 0.9, 0.999, 1e-8)`.
    pub fn with_defaults(learning_rate: f32) -> Result<Self, ModelError> {
        Self::new(learning_rate, 0.9, 0.999, 1e-8)
    }

    /// Returns the current training step counter.
    pub fn step_count(&self) -> u64 {
        self.t
    }

    /// Returns the moment buffers for a parameter, if any update touched it.
    pub fn states(&self, id: ParamId) -> Option<&AdamStates> {
        self.moments.get(&id)
    }
}

impl Optimizer for Adam {
    fn begin_step(&mut self) {
        self.t += 1; // One shared increment per training step
    }

    fn update(&mut self, id: ParamId, param: &mut Array2<f32>, grad: &Array2<f32>) {
        let t = self.t.max(1);
        let (beta1, beta2) = (self.beta1, self.beta2);

        let states = self
            .moments
            .entry(id)
            .or_insert_with(|| AdamStates::new(grad.raw_dim()));

        // m = beta1*m + (1-beta1)*g, v = beta2*v + (1-beta2)*g^2
        states.m = states.m.mapv(|x| x * beta1) + &(grad * (1.0 - beta1));
        states.v = states.v.mapv(|x| x * beta2) + &(grad.mapv(|x| x * x) * (1.0 - beta2));

        // Bias-corrected moment estimates
        let m_hat = states.m.mapv(|x| x / (1.0 - beta1.powi(t as i32)));
        let v_hat = states.v.mapv(|x| x / (1.0 - beta2.powi(t as i32)));

        *param = &*param - &(self.learning_rate * &m_hat / &(v_hat.mapv(f32::sqrt) + self.epsilon));
    }

    fn kind(&self) -> OptimizerKind {
        OptimizerKind::Adam
    }
}

/// Validates that an exponential decay rate lies in [0, 1)
fn validate_decay_rate(value: f32, name: &str) -> Result<(), ModelError> {
    if !(0.0..1.0).contains(&value) {
        return Err(ModelError::InputValidationError(format!(
            "{} must be in [0, 1), got {}",
            name, value
        )));
    }
    Ok(())
}

/// Builds a boxed optimizer of the given kind.
///
/// Adam is constructed with its conventional defaults
/// (beta1 = 0.9, beta2 = 0.999, epsilon = 1e-8).
///
/// # Parameters
///
/// - `kind` - Which optimizer to build
/// - `learning_rate` - Step size for parameter updates
///
/// # Returns
///
/// - `Ok(Box<dyn Optimizer>)` - The freshly built optimizer with empty state
/// - `Err(ModelError::InputValidationError)` - If the learning rate is invalid
pub fn build_optimizer(
    kind: OptimizerKind,
    learning_rate: f32,
) -> Result<Box<dyn Optimizer>, ModelError> {
    Ok(match kind {
        OptimizerKind::Sgd => Box::new(SGD::new(learning_rate)?),
        OptimizerKind::Adam => Box::new(Adam::with_defaults(learning_rate)?),
    })
}
