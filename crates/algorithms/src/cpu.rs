//! Arithmetic backend selection
//!
//! Capability detection runs once, on first use, and the result is cached in
//! a process-wide atomic that is never written again. Callers only ever see
//! the resolved [`Backend`].

use portable_atomic::{AtomicU8, Ordering};

const UNRESOLVED: u8 = 0;
const PORTABLE: u8 = 1;
const WIDE: u8 = 2;

static BACKEND: AtomicU8 = AtomicU8::new(UNRESOLVED);

/// Base-field multiplication kernel in use
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Limb-loop Montgomery multiplication (CIOS), any target
    Portable,
    /// Fully unrolled 6x6 product with separate reduction, chosen on
    /// 64-bit targets with wide-multiply carry-chain support (BMI2 + ADX
    /// on x86_64, any aarch64)
    Wide,
}

impl Backend {
    fn from_tag(tag: u8) -> Self {
        if tag == WIDE {
            Backend::Wide
        } else {
            Backend::Portable
        }
    }

    fn tag(self) -> u8 {
        match self {
            Backend::Portable => PORTABLE,
            Backend::Wide => WIDE,
        }
    }
}

/// Returns the process-wide arithmetic backend, detecting it on first call.
#[inline]
pub fn backend() -> Backend {
    let tag = BACKEND.load(Ordering::Relaxed);
    if tag != UNRESOLVED {
        return Backend::from_tag(tag);
    }
    resolve()
}

#[cold]
fn resolve() -> Backend {
    let detected = detect();
    match BACKEND.compare_exchange(UNRESOLVED, detected.tag(), Ordering::AcqRel, Ordering::Acquire)
    {
        Ok(_) => {
            log::debug!("bls12-381 arithmetic backend: {:?}", detected);
            detected
        }
        Err(existing) => Backend::from_tag(existing),
    }
}

#[cfg(feature = "portable")]
fn detect() -> Backend {
    Backend::Portable
}

#[cfg(all(not(feature = "portable"), feature = "std", target_arch = "x86_64"))]
fn detect() -> Backend {
    if std::is_x86_feature_detected!("bmi2") && std::is_x86_feature_detected!("adx") {
        Backend::Wide
    } else {
        Backend::Portable
    }
}

#[cfg(all(not(feature = "portable"), target_arch = "aarch64"))]
fn detect() -> Backend {
    Backend::Wide
}

#[cfg(all(
    not(feature = "portable"),
    not(target_arch = "aarch64"),
    not(all(feature = "std", target_arch = "x86_64"))
))]
fn detect() -> Backend {
    Backend::Portable
}
