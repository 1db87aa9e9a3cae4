//! Shared debounce primitive and confirm-entry latch.
//!
//! Entry into DETECT/CONFIRM is cheap: every cycle with the fault condition
//! present advances the confirmation counter. Exit is debounced only from
//! CONFIRM: a DETECT state collapses to NORMAL as soon as the condition
//! disappears, while a confirmed fault needs `recovery_threshold`
//! consecutive cycles of recovery evidence.
//!
//! Counters saturate at `u8::MAX` instead of wrapping.

use serde::{Deserialize, Serialize};

use crate::fault::FaultStatus;

/// Confirmation and recovery thresholds, in consecutive cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceParams {
    pub confirm_threshold: u8,
    pub recovery_threshold: u8,
}

impl DebounceParams {
    pub const fn new(confirm_threshold: u8, recovery_threshold: u8) -> Self {
        Self {
            confirm_threshold,
            recovery_threshold,
        }
    }
}

/// Private counters of one debounced detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Debouncer {
    confirm_count: u8,
    recovery_count: u8,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the debounce state by one cycle.
    ///
    /// # Parameters
    /// - `current`: Status at the end of the previous cycle.
    /// - `fault_active`: Fault condition evaluated on this cycle's snapshot.
    /// - `recovery_active`: Recovery condition; only consulted while `current` is CONFIRM.
    /// - `params`: Thresholds of the owning detector.
    ///
    /// # Returns
    /// The status for this cycle.
    pub fn step(
        &mut self,
        current: FaultStatus,
        fault_active: bool,
        recovery_active: bool,
        params: DebounceParams,
    ) -> FaultStatus {
        if fault_active {
            self.confirm_count = self.confirm_count.saturating_add(1);
            self.recovery_count = 0;

            return if self.confirm_count >= params.confirm_threshold {
                FaultStatus::Confirm
            } else {
                FaultStatus::Detect
            };
        }

        self.confirm_count = 0;

        if current.is_confirmed() && recovery_active {
            self.recovery_count = self.recovery_count.saturating_add(1);
            if self.recovery_count >= params.recovery_threshold {
                self.reset();
                return FaultStatus::Normal;
            }
            return FaultStatus::Confirm;
        }

        self.recovery_count = 0;
        if current.is_confirmed() {
            FaultStatus::Confirm
        } else {
            FaultStatus::Normal
        }
    }

    /// Clears both counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Consecutive cycles the fault condition has been present.
    #[inline]
    pub fn confirm_count(&self) -> u8 {
        self.confirm_count
    }

    /// Consecutive cycles of recovery evidence while confirmed.
    #[inline]
    pub fn recovery_count(&self) -> u8 {
        self.recovery_count
    }
}

/// Counts entries into CONFIRM and trips once a threshold is reached.
///
/// Cycles spent inside CONFIRM do not count, only the NORMAL/DETECT ->
/// CONFIRM edge does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceLatch {
    entries: u8,
    threshold: u8,
}

impl OccurrenceLatch {
    pub fn new(threshold: u8) -> Self {
        Self {
            entries: 0,
            threshold,
        }
    }

    /// Records a status change and reports whether the latch has tripped.
    pub fn record(&mut self, previous: FaultStatus, next: FaultStatus) -> bool {
        if !previous.is_confirmed() && next.is_confirmed() {
            self.entries = self.entries.saturating_add(1);
        }
        self.is_tripped()
    }

    #[inline]
    pub fn is_tripped(&self) -> bool {
        self.entries >= self.threshold
    }

    #[inline]
    pub fn entries(&self) -> u8 {
        self.entries
    }

    pub fn reset(&mut self) {
        self.entries = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: DebounceParams = DebounceParams::new(3, 2);

    #[test]
    fn confirms_exactly_at_threshold() {
        let mut debouncer = Debouncer::new();
        let mut status = FaultStatus::Normal;

        status = debouncer.step(status, true, false, PARAMS);
        assert_eq!(status, FaultStatus::Detect);
        status = debouncer.step(status, true, false, PARAMS);
        assert_eq!(status, FaultStatus::Detect);
        status = debouncer.step(status, true, false, PARAMS);
        assert_eq!(status, FaultStatus::Confirm);
        assert_eq!(debouncer.confirm_count(), 3);
    }

    #[test]
    fn detect_collapses_immediately() {
        let mut debouncer = Debouncer::new();
        let status = debouncer.step(FaultStatus::Normal, true, false, PARAMS);
        assert_eq!(status, FaultStatus::Detect);

        let status = debouncer.step(status, false, false, PARAMS);
        assert_eq!(status, FaultStatus::Normal);
        assert_eq!(debouncer.confirm_count(), 0);
    }

    #[test]
    fn confirm_holds_without_recovery_evidence() {
        let mut debouncer = Debouncer::new();
        let status = debouncer.step(FaultStatus::Confirm, false, false, PARAMS);
        assert_eq!(status, FaultStatus::Confirm);
        assert_eq!(debouncer.recovery_count(), 0);
    }

    #[test]
    fn recovery_requires_consecutive_cycles() {
        let mut debouncer = Debouncer::new();
        let mut status = FaultStatus::Confirm;

        status = debouncer.step(status, false, true, PARAMS);
        assert_eq!(status, FaultStatus::Confirm);
        assert_eq!(debouncer.recovery_count(), 1);

        // Interruption resets the recovery counter.
        status = debouncer.step(status, false, false, PARAMS);
        assert_eq!(debouncer.recovery_count(), 0);

        status = debouncer.step(status, false, true, PARAMS);
        assert_eq!(status, FaultStatus::Confirm);
        status = debouncer.step(status, false, true, PARAMS);
        assert_eq!(status, FaultStatus::Normal);
        assert_eq!(debouncer, Debouncer::new());
    }

    #[test]
    fn recovery_ignored_unless_confirmed() {
        let mut debouncer = Debouncer::new();
        let status = debouncer.step(FaultStatus::Detect, false, true, PARAMS);
        assert_eq!(status, FaultStatus::Normal);
        assert_eq!(debouncer.recovery_count(), 0);
    }

    #[test]
    fn fault_during_recovery_restarts_confirmation() {
        let mut debouncer = Debouncer::new();
        let status = debouncer.step(FaultStatus::Confirm, false, true, PARAMS);
        assert_eq!(debouncer.recovery_count(), 1);

        let status = debouncer.step(status, true, false, PARAMS);
        assert_eq!(status, FaultStatus::Detect);
        assert_eq!(debouncer.recovery_count(), 0);
        assert_eq!(debouncer.confirm_count(), 1);
    }

    #[test]
    fn confirmation_counter_saturates() {
        let mut debouncer = Debouncer::new();
        let mut status = FaultStatus::Normal;
        for _ in 0..1000 {
            status = debouncer.step(status, true, false, PARAMS);
        }
        assert_eq!(status, FaultStatus::Confirm);
        assert_eq!(debouncer.confirm_count(), u8::MAX);
    }

    #[test]
    fn immediate_params_follow_the_level() {
        let params = DebounceParams::new(1, 1);
        let mut debouncer = Debouncer::new();
        let status = debouncer.step(FaultStatus::Normal, true, false, params);
        assert_eq!(status, FaultStatus::Confirm);
        let status = debouncer.step(status, false, true, params);
        assert_eq!(status, FaultStatus::Normal);
    }

    #[test]
    fn latch_counts_only_confirm_entries() {
        let mut latch = OccurrenceLatch::new(3);
        assert!(!latch.record(FaultStatus::Normal, FaultStatus::Confirm));
        assert!(!latch.record(FaultStatus::Confirm, FaultStatus::Confirm));
        assert!(!latch.record(FaultStatus::Confirm, FaultStatus::Normal));
        assert_eq!(latch.entries(), 1);

        assert!(!latch.record(FaultStatus::Detect, FaultStatus::Confirm));
        assert!(!latch.record(FaultStatus::Confirm, FaultStatus::Normal));
        assert!(latch.record(FaultStatus::Normal, FaultStatus::Confirm));
        assert!(latch.is_tripped());

        latch.reset();
        assert_eq!(latch.entries(), 0);
        assert!(!latch.is_tripped());
    }
}
