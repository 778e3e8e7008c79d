use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GeoFrameError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Latitude iteration did not converge after {iterations} iterations (last step {last_step:e} rad)"
    )]
    ConvergenceFailure { iterations: usize, last_step: f64 },
}

impl GeoFrameError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        GeoFrameError::InvalidInput(msg.into())
    }

    /// Fail with [`GeoFrameError::InvalidInput`] unless `value` is finite.
    pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<f64, GeoFrameError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(GeoFrameError::invalid(format!("{name} must be finite, got {value}")))
        }
    }
}

impl PartialEq for GeoFrameError {
    fn eq(&self, other: &Self) -> bool {
        use GeoFrameError::*;
        match (self, other) {
            (InvalidInput(a), InvalidInput(b)) => a == b,

            // the last step is diagnostic only: same cap means same failure
            (
                ConvergenceFailure { iterations: a, .. },
                ConvergenceFailure { iterations: b, .. },
            ) => a == b,

            _ => false,
        }
    }
}
