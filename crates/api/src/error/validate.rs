//! Boundary validation helpers returning the public error type

use super::types::{Error, Result};

/// Validate an exact length
#[inline(always)]
pub fn length(context: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::InvalidLength {
            context,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Validate a minimum length
#[inline(always)]
pub fn min_length(context: &'static str, actual: usize, min: usize) -> Result<()> {
    if actual < min {
        return Err(Error::InvalidLength {
            context,
            expected: min,
            actual,
        });
    }
    Ok(())
}

/// Validate that a caller-provided scratch buffer is large enough
#[inline(always)]
pub fn scratch(required: usize, provided: usize) -> Result<()> {
    if provided < required {
        return Err(Error::InsufficientScratch { required, provided });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_checks() {
        assert!(length("fp", 48, 48).is_ok());
        assert!(length("fp", 32, 48).is_err());
        assert!(min_length("ikm", 32, 32).is_ok());
        assert_eq!(
            min_length("ikm", 31, 32),
            Err(Error::InvalidLength {
                context: "ikm",
                expected: 32,
                actual: 31
            })
        );
        assert_eq!(
            scratch(16, 15),
            Err(Error::InsufficientScratch {
                required: 16,
                provided: 15
            })
        );
    }
}
