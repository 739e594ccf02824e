//! Error handling
//!
//! Everything that can go wrong in this crate is a violation of the calling
//! contract by the upstream topology classifier (wrong array sizes, wrong
//! lepton multiplicity or charge configuration). Numerically degenerate
//! geometry is not an error: it surfaces as NaN/Inf in the computed angles.

use thiserror::Error;

/// Invalid input handed over by the caller
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Per-lepton input arrays do not have matching lengths
    #[error("{what} has {found} entries, expected {expected}")]
    LengthMismatch {
        /// Which input array is wrongly sized
        what: &'static str,
        /// Expected number of entries
        expected: usize,
        /// Actual number of entries
        found: usize,
    },

    /// The wrong number of leptons was provided for the requested topology
    #[error("expected {expected} leptons, found {found}")]
    LeptonCount {
        /// Number of leptons required by the topology
        expected: usize,
        /// Number of leptons received
        found: usize,
    },

    /// Same-flavor leptons do not come as two positive and two negative
    #[error("expected 2 positive and 2 negative charges, found {positive}+ and {negative}-")]
    ChargeSplit {
        /// Number of leptons of charge +1
        positive: usize,
        /// Number of leptons of charge -1
        negative: usize,
    },

    /// No opposite-charge lepton pair could be formed
    ///
    /// Same-flavor pairing checks the charge split first, so lepton sets
    /// without any opposite-charge pair are reported as `ChargeSplit`.
    ///
    #[error("no opposite-charge lepton pair available")]
    NoOppositeChargePair,

    /// A lepton index points outside of the per-lepton arrays
    #[error("lepton index {index} is out of range for {len} leptons")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Number of leptons available
        len: usize,
    },
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Check that an input array has the expected number of entries
pub(crate) fn ensure_len<T>(what: &'static str, values: &[T], expected: usize) -> Result<()> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            what,
            expected,
            found: values.len(),
        })
    }
}

/// Check that exactly `expected` leptons were provided
pub(crate) fn ensure_count<T>(values: &[T], expected: usize) -> Result<()> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(Error::LeptonCount {
            expected,
            found: values.len(),
        })
    }
}

/// Bounds-checked access to a per-lepton array
pub(crate) fn checked_get<T: Copy>(values: &[T], index: usize) -> Result<T> {
    values.get(index).copied().ok_or(Error::IndexOutOfRange {
        index,
        len: values.len(),
    })
}
