//! Error handling traits for the blscore ecosystem

use super::types::{Error, Result};
use subtle::CtOption;

/// Extension trait for Result types
pub trait ResultExt<T, E>: Sized {
    /// Wrap an error with additional context
    fn wrap_err<F, E2>(self, f: F) -> core::result::Result<T, E2>
    where
        F: FnOnce() -> E2;

    /// Add context to an error when converting to Error
    fn with_context(self, context: &'static str) -> Result<T>
    where
        E: Into<Error>;

    #[cfg(feature = "std")]
    /// Add message to an error when converting to Error
    fn with_message(self, message: impl Into<String>) -> Result<T>
    where
        E: Into<Error>;
}

impl<T, E> ResultExt<T, E> for core::result::Result<T, E> {
    fn wrap_err<F, E2>(self, f: F) -> core::result::Result<T, E2>
    where
        F: FnOnce() -> E2,
    {
        self.map_err(|_| f())
    }

    fn with_context(self, context: &'static str) -> Result<T>
    where
        E: Into<Error>,
    {
        self.map_err(|e| e.into().with_context(context))
    }

    #[cfg(feature = "std")]
    fn with_message(self, message: impl Into<String>) -> Result<T>
    where
        E: Into<Error>,
    {
        self.map_err(|e| e.into().with_message(message))
    }
}

/// Converts the constant-time optional values produced by decoders into
/// ordinary results once the caller is ready to branch.
pub trait ConstantTimeResult<T> {
    /// Map `None` to the supplied error
    fn ct_or(self, err: Error) -> Result<T>;

    /// Map `None` to [`Error::OutOfRange`]
    fn ct_or_out_of_range(self, context: &'static str) -> Result<T>;

    /// Map `None` to [`Error::NotInGroup`]
    fn ct_or_not_in_group(self, context: &'static str) -> Result<T>;
}

impl<T> ConstantTimeResult<T> for CtOption<T> {
    fn ct_or(self, err: Error) -> Result<T> {
        Option::<T>::from(self).ok_or(err)
    }

    fn ct_or_out_of_range(self, context: &'static str) -> Result<T> {
        self.ct_or(Error::OutOfRange { context })
    }

    fn ct_or_not_in_group(self, context: &'static str) -> Result<T> {
        self.ct_or(Error::NotInGroup { context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subtle::Choice;

    #[test]
    fn test_ct_option_conversion() {
        let some = CtOption::new(7u64, Choice::from(1));
        assert_eq!(some.ct_or_out_of_range("x").ok(), Some(7));

        let none = CtOption::new(7u64, Choice::from(0));
        assert_eq!(
            none.ct_or_not_in_group("G2Affine::from_compressed"),
            Err(Error::NotInGroup {
                context: "G2Affine::from_compressed"
            })
        );
    }
}
