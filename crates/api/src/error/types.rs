//! Error type definitions for curve and field operations

#[cfg(feature = "std")]
use std::string::String;

/// Primary error type for blscore operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Error {
    /// Invalid length error with context
    #[cfg_attr(
        feature = "std",
        error("{context}: invalid length (expected {expected}, got {actual})")
    )]
    InvalidLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Invalid parameter error
    #[cfg_attr(feature = "std", error("{context}: {message}"))]
    InvalidParameter {
        context: &'static str,
        #[cfg(feature = "std")]
        message: String,
    },

    /// A residue or scalar was not below its modulus
    #[cfg_attr(feature = "std", error("{context}: value out of range for modulus"))]
    OutOfRange { context: &'static str },

    /// Byte or hex encoding could not be decoded
    #[cfg_attr(feature = "std", error("Invalid encoding: {context}: {message}"))]
    InvalidEncoding {
        context: &'static str,
        #[cfg(feature = "std")]
        message: String,
    },

    /// Decoded point is not on the curve or not in the prime-order subgroup
    #[cfg_attr(feature = "std", error("{context}: point not in group"))]
    NotInGroup { context: &'static str },

    /// Caller-provided scratch buffer is shorter than required
    #[cfg_attr(
        feature = "std",
        error("insufficient scratch: {required} entries required, {provided} provided")
    )]
    InsufficientScratch { required: usize, provided: usize },

    /// Other error
    #[cfg_attr(feature = "std", error("{context}: {message}"))]
    Other {
        context: &'static str,
        #[cfg(feature = "std")]
        message: String,
    },
}

/// Result type for blscore operations
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Replace the context of an existing error
    pub fn with_context(self, context: &'static str) -> Self {
        match self {
            Self::InvalidLength { expected, actual, .. } => Self::InvalidLength {
                context,
                expected,
                actual,
            },
            #[cfg(feature = "std")]
            Self::InvalidParameter { message, .. } => Self::InvalidParameter { context, message },
            #[cfg(not(feature = "std"))]
            Self::InvalidParameter { .. } => Self::InvalidParameter { context },
            Self::OutOfRange { .. } => Self::OutOfRange { context },
            #[cfg(feature = "std")]
            Self::InvalidEncoding { message, .. } => Self::InvalidEncoding { context, message },
            #[cfg(not(feature = "std"))]
            Self::InvalidEncoding { .. } => Self::InvalidEncoding { context },
            Self::NotInGroup { .. } => Self::NotInGroup { context },
            scratch @ Self::InsufficientScratch { .. } => scratch,
            #[cfg(feature = "std")]
            Self::Other { message, .. } => Self::Other { context, message },
            #[cfg(not(feature = "std"))]
            Self::Other { .. } => Self::Other { context },
        }
    }

    /// Add a message to an existing error (when std is available)
    #[cfg(feature = "std")]
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        match self {
            Self::InvalidParameter { context, .. } => Self::InvalidParameter { context, message },
            Self::InvalidEncoding { context, .. } => Self::InvalidEncoding { context, message },
            Self::Other { context, .. } => Self::Other { context, message },
            other => other,
        }
    }

    /// Returns the static context string attached to this error, if any
    pub fn context(&self) -> Option<&'static str> {
        match self {
            Self::InvalidLength { context, .. }
            | Self::InvalidParameter { context, .. }
            | Self::OutOfRange { context }
            | Self::InvalidEncoding { context, .. }
            | Self::NotInGroup { context }
            | Self::Other { context, .. } => Some(context),
            Self::InsufficientScratch { .. } => None,
        }
    }
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLength { context, expected, actual } => {
                write!(f, "{}: invalid length (expected {}, got {})", context, expected, actual)
            }
            Self::InvalidParameter { context } => write!(f, "Invalid parameter: {}", context),
            Self::OutOfRange { context } => write!(f, "{}: value out of range for modulus", context),
            Self::InvalidEncoding { context } => write!(f, "Invalid encoding: {}", context),
            Self::NotInGroup { context } => write!(f, "{}: point not in group", context),
            Self::InsufficientScratch { required, provided } => write!(
                f,
                "insufficient scratch: {} entries required, {} provided",
                required, provided
            ),
            Self::Other { context } => write!(f, "Error: {}", context),
        }
    }
}
