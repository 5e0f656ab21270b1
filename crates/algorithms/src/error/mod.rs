//! Error handling for the arithmetic core

use core::fmt;

use blscore_api::{Error as CoreError, Result as CoreResult};

/// The error type for field, curve and key-derivation primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Parameter validation error
    Parameter {
        /// Name of the invalid parameter
        name: &'static str,
        /// Reason why the parameter is invalid
        reason: &'static str,
    },

    /// Length validation error
    Length {
        /// Context where the length error occurred
        context: &'static str,
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// A residue or scalar was not below its modulus
    OutOfRange {
        /// Routine that rejected the value
        context: &'static str,
    },

    /// Malformed byte or hex encoding
    Encoding {
        /// Routine that rejected the encoding
        context: &'static str,
        /// What was wrong with it
        details: &'static str,
    },

    /// Point failed the on-curve or subgroup check
    NotInGroup {
        /// Routine that performed the check
        context: &'static str,
    },

    /// Caller-provided scratch buffer is too short
    InsufficientScratch {
        /// Entries required
        required: usize,
        /// Entries provided
        provided: usize,
    },

    /// Fallback for other errors
    Other(&'static str),
}

impl Error {
    /// Shorthand to create a Parameter error
    pub const fn param(name: &'static str, reason: &'static str) -> Self {
        Error::Parameter { name, reason }
    }
}

/// Result type for arithmetic-core operations
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            Error::Length {
                context,
                expected,
                actual,
            } => write!(
                f,
                "Invalid length for {}: expected {}, got {}",
                context, expected, actual
            ),
            Error::OutOfRange { context } => {
                write!(f, "Value out of range in {}", context)
            }
            Error::Encoding { context, details } => {
                write!(f, "Invalid encoding in {}: {}", context, details)
            }
            Error::NotInGroup { context } => write!(f, "Point not in group in {}", context),
            Error::InsufficientScratch { required, provided } => write!(
                f,
                "Insufficient scratch: {} required, {} provided",
                required, provided
            ),
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<Error> for CoreError {
    fn from(err: Error) -> Self {
        match err {
            Error::Parameter { name, reason } => {
                #[cfg(not(feature = "std"))]
                let _ = reason;
                CoreError::InvalidParameter {
                    context: name,
                    #[cfg(feature = "std")]
                    message: reason.to_string(),
                }
            }
            Error::Length {
                context,
                expected,
                actual,
            } => CoreError::InvalidLength {
                context,
                expected,
                actual,
            },
            Error::OutOfRange { context } => CoreError::OutOfRange { context },
            Error::Encoding { context, details } => {
                #[cfg(not(feature = "std"))]
                let _ = details;
                CoreError::InvalidEncoding {
                    context,
                    #[cfg(feature = "std")]
                    message: details.to_string(),
                }
            }
            Error::NotInGroup { context } => CoreError::NotInGroup { context },
            Error::InsufficientScratch { required, provided } => {
                CoreError::InsufficientScratch { required, provided }
            }
            Error::Other(msg) => CoreError::Other {
                context: msg,
                #[cfg(feature = "std")]
                message: String::new(),
            },
        }
    }
}

/// Convert a primitives result to a core result with additional context
#[inline]
pub fn to_core_result<T>(r: Result<T>, ctx: &'static str) -> CoreResult<T> {
    r.map_err(|e| CoreError::from(e).with_context(ctx))
}

// Re-export core error handling traits for convenience
pub use blscore_api::error::{ConstantTimeResult, ResultExt};

pub mod validate;
