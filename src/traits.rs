//! Core detector trait.
//!
//! Every fault code is diagnosed by one [`Detector`]. The engine owns the
//! detectors and the status table; each detector owns only its private
//! counters and never sees another detector's state.

use std::fmt::Debug;

use crate::fault::{FaultCode, FaultStatus};
use crate::snapshot::InputSnapshot;

/// Result of running one detector for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// New status of the detector's fault code.
    pub status: FaultStatus,
    /// True when the detector requests the permanent system lockout.
    pub lockout: bool,
}

impl Verdict {
    /// Verdict that does not touch the lockout flag.
    #[inline]
    pub const fn status(status: FaultStatus) -> Self {
        Self {
            status,
            lockout: false,
        }
    }
}

/// Defines the interface for a per-fault-code state machine.
pub trait Detector: Send + Sync + Debug {
    /// Returns the fault code this detector diagnoses.
    fn code(&self) -> FaultCode;

    /// Advances the detector by one cycle.
    ///
    /// # Parameters
    /// - `snapshot`: Measurements of the current cycle.
    /// - `current`: Status of this detector's fault code after the previous cycle.
    ///
    /// # Returns
    /// The new status and whether the lockout threshold has been reached.
    fn diagnose(&mut self, snapshot: &InputSnapshot, current: FaultStatus) -> Verdict;

    /// Returns every private counter to its initial value.
    fn reset(&mut self);
}
