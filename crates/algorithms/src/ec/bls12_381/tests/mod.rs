//! BLS12-381 test suite
//!
//! Tests are organized into focused modules for better maintainability.



#[cfg(all(test, feature = "alloc"))]
mod msm;

#[cfg(test)]
mod pairings;

#[cfg(test)]
mod serialization;
