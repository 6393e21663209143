//! Error types.
//!
//! Two layers:
//!
//! - `LtvError`: typed failures of the numerical core (fit + projection).
//!   Every variant is local to a single computation request.
//! - `AppError`: what the binary reports, carrying a process exit code.
//!
//! Exit codes follow a simple convention:
//! - `2`: bad input / configuration / file IO
//! - `4`: numerical or upstream data failure

/// Failures of the fitting and projection core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LtvError {
    #[error("Invalid retention observations: {0}")]
    InvalidObservations(String),

    #[error("Retention curve fit did not converge: {0}")]
    FitDidNotConverge(String),

    #[error("ROAS is undefined for CPI = 0.")]
    DivisionByZero,

    #[error("Horizon day {horizon} is outside the supported range [0, {max}].")]
    HorizonOutOfRange { horizon: u32, max: u32 },
}

impl LtvError {
    pub fn exit_code(&self) -> u8 {
        match self {
            LtvError::InvalidObservations(_)
            | LtvError::DivisionByZero
            | LtvError::HorizonOutOfRange { .. } => 2,
            LtvError::FitDidNotConverge(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<LtvError> for AppError {
    fn from(err: LtvError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let e: AppError = LtvError::DivisionByZero.into();
        assert_eq!(e.exit_code(), 2);
        assert_eq!(e.to_string(), "ROAS is undefined for CPI = 0.");

        let e: AppError = LtvError::FitDidNotConverge("damping exploded".into()).into();
        assert_eq!(e.exit_code(), 4);

        let e: AppError = LtvError::HorizonOutOfRange { horizon: 721, max: 720 }.into();
        assert_eq!(e.exit_code(), 2);
        assert!(e.to_string().contains("721"));
    }
}
