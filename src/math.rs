use ndarray::ArrayView1;

/// Computes the logistic sigmoid for a scalar input.
///
/// The sigmoid maps any real number into the open interval (0, 1) with
/// saturation for extreme values to preserve numerical stability.
///
/// # Parameters
///
/// - `z` - Input value to transform
///
/// # Returns
///
/// - `f32` - Sigmoid output in the range (0, 1)
///
/// # Examples
/// ```rust
/// use gatedseq::math::sigmoid;
///
/// let value = sigmoid(0.0);
/// // sigmoid(0) = 0.5
/// assert!((value - 0.5).abs() < 1e-6);
/// ```
#[inline]
pub fn sigmoid(z: f32) -> f32 {
    // Use numerically stable computation for extreme values
    const MAX_SIGMOID_INPUT: f32 = 500.0;
    const MIN_SIGMOID_INPUT: f32 = -500.0;

    if z > MAX_SIGMOID_INPUT {
        // For very large positive values, sigmoid(z) approaches 1
        return 1.0;
    } else if z < MIN_SIGMOID_INPUT {
        // For very large negative values, sigmoid(z) approaches 0
        return 0.0;
    }

    // Standard computation for normal range
    1.0 / (1.0 + (-z).exp())
}

/// Computes the hyperbolic tangent with input clamping.
///
/// Clamps the argument to ±500 before evaluating `tanh`, the same stability
/// guard used for the sigmoid.
///
/// # Parameters
///
/// - `z` - Input value to transform
///
/// # Returns
///
/// - `f32` - Tanh output in the range (-1, 1)
#[inline]
pub fn stable_tanh(z: f32) -> f32 {
    z.clamp(-500.0, 500.0).tanh()
}

/// Calculates the half mean squared error between two vectors.
///
/// Computes `0.5 * mean((prediction - target)^2)` over the components. For a
/// one-dimensional output this is exactly `0.5 * (prediction - target)^2`.
///
/// # Parameters
///
/// - `prediction` - Predicted values
/// - `target` - Expected values, same length as `prediction`
///
/// # Returns
///
/// - `f32` - Half mean squared error
///
/// # Examples
/// ```rust
/// use gatedseq::math::half_squared_error;
/// use ndarray::array;
///
/// let prediction = array![1.0_f32];
/// let target = array![3.0_f32];
/// // 0.5 * (1 - 3)^2 = 2.0
/// assert!((half_squared_error(prediction.view(), target.view()) - 2.0).abs() < 1e-6);
/// ```
#[inline]
pub fn half_squared_error(prediction: ArrayView1<f32>, target: ArrayView1<f32>) -> f32 {
    let n = prediction.len() as f32;
    let sum_squared = prediction
        .iter()
        .zip(target.iter())
        .map(|(p, t)| (p - t) * (p - t))
        .sum::<f32>();
    0.5 * sum_squared / n
}

/// Calculates the mean componentwise difference between two vectors.
///
/// The result collapses a vector-valued prediction error into the scalar used
/// by the closed-form bias updates. For a one-dimensional output this is
/// exactly `prediction - target`.
///
/// # Parameters
///
/// - `prediction` - Predicted values
/// - `target` - Expected values, same length as `prediction`
///
/// # Returns
///
/// - `f32` - Mean of `prediction - target` over the components
#[inline]
pub fn mean_error(prediction: ArrayView1<f32>, target: ArrayView1<f32>) -> f32 {
    let n = prediction.len() as f32;
    let sum = prediction
        .iter()
        .zip(target.iter())
        .map(|(p, t)| p - t)
        .sum::<f32>();
    sum / n
}
