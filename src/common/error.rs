use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // Capacity
    #[error("Data too long")]
    DataTooLong,
    #[error("Data doesn't fit in the forced version")]
    InvalidForcedVersion,

    // Input validation
    #[error("Unsupported character for the selected mode")]
    UnsupportedCharacter,

    // Configuration
    #[error("Invalid version")]
    InvalidVersion,
    #[error("Invalid masking pattern")]
    InvalidMaskingPattern,
    #[error("Invalid ECI assignment number")]
    InvalidEci,

    // Galois field
    #[error("Division by zero in GF(256)")]
    DivisionByZero,
}

pub type QRResult<T> = Result<T, QRError>;
