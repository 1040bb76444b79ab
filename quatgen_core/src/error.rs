use thiserror::Error;

/// Quatgen'in tüm hata durumları.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuatgenError {
    #[error("parse error: {0}")]
    Parse(String),

    /// Division by something other than a non-zero constant.
    #[error("expression is not a polynomial: {0}")]
    NonPolynomial(String),

    #[error("e-graph optimizer panicked")]
    OptimizerPanic,
}

pub type Result<T> = std::result::Result<T, QuatgenError>;
