use super::*;

/// Validates that a dimension value is greater than 0
///
/// # Parameters
///
/// - `value` - The dimension value to validate
/// - `name` - The name of the dimension for error messages
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError)` if validation fails
pub(super) fn validate_dimension_greater_than_zero(
    value: usize,
    name: &str,
) -> Result<(), ModelError> {
    if value == 0 {
        return Err(ModelError::InputValidationError(format!(
            "{} must be greater than 0",
            name
        )));
    }
    Ok(())
}

/// Validates that a learning rate is positive and finite
///
/// # Parameters
///
/// - `learning_rate` - The learning rate to validate
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError)` if validation fails
pub(super) fn validate_learning_rate(learning_rate: f32) -> Result<(), ModelError> {
    if learning_rate <= 0.0 || !learning_rate.is_finite() {
        return Err(ModelError::InputValidationError(format!(
            "learning_rate must be positive and finite, got {}",
            learning_rate
        )));
    }
    Ok(())
}

/// Validates that every vector of a sequence has the expected length
///
/// # Parameters
///
/// - `items` - The sequence of vectors to validate
/// - `expected_len` - The expected length of each vector
/// - `name` - The name of the sequence for error messages
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError)` if any vector has a different length
pub(super) fn validate_vector_lengths(
    items: &[Array1<f32>],
    expected_len: usize,
    name: &str,
) -> Result<(), ModelError> {
    for (index, item) in items.iter().enumerate() {
        if item.len() != expected_len {
            return Err(ModelError::InputValidationError(format!(
                "{}[{}] has length {}, expected {}",
                name,
                index,
                item.len(),
                expected_len
            )));
        }
    }
    Ok(())
}

/// Validates that two index-aligned collections have the same length
///
/// # Parameters
///
/// - `left_len` - Length of the first collection
/// - `right_len` - Length of the second collection
/// - `left_name` - Name of the first collection for error messages
/// - `right_name` - Name of the second collection for error messages
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError)` if the lengths differ
pub(super) fn validate_aligned_lengths(
    left_len: usize,
    right_len: usize,
    left_name: &str,
    right_name: &str,
) -> Result<(), ModelError> {
    if left_len != right_len {
        return Err(ModelError::InputValidationError(format!(
            "{} has length {} but {} has length {}, expected them to be index-aligned",
            left_name, left_len, right_name, right_len
        )));
    }
    Ok(())
}
