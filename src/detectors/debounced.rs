//! Table-parameterized debounced detector.
//!
//! Covers every fault code whose behaviour is fully described by a fault
//! predicate, a recovery predicate and a pair of thresholds. Latching codes
//! additionally carry an [`OccurrenceLatch`].

use tracing::trace;

use super::conditions::Condition;
use crate::debounce::{DebounceParams, Debouncer, OccurrenceLatch};
use crate::fault::{FaultCode, FaultStatus};
use crate::snapshot::InputSnapshot;
use crate::traits::{Detector, Verdict};

/// Detector built on the shared [`Debouncer`].
#[derive(Debug, Clone)]
pub struct DebouncedDetector {
    code: FaultCode,
    params: DebounceParams,
    fault_condition: Condition,
    recovery_condition: Condition,
    debouncer: Debouncer,
    latch: Option<OccurrenceLatch>,
}

impl DebouncedDetector {
    pub fn new(
        code: FaultCode,
        params: DebounceParams,
        fault_condition: Condition,
        recovery_condition: Condition,
    ) -> Self {
        Self {
            code,
            params,
            fault_condition,
            recovery_condition,
            debouncer: Debouncer::new(),
            latch: None,
        }
    }

    /// Requests the system lockout after `occurrences` entries into CONFIRM.
    ///
    /// Once tripped, the detector no longer recovers on its own.
    pub fn with_lockout(mut self, occurrences: u8) -> Self {
        self.latch = Some(OccurrenceLatch::new(occurrences));
        self
    }

    pub fn params(&self) -> DebounceParams {
        self.params
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Confirm entries recorded so far, `None` for non-latching codes.
    pub fn occurrences(&self) -> Option<u8> {
        self.latch.as_ref().map(OccurrenceLatch::entries)
    }

    fn latch_tripped(&self) -> bool {
        self.latch.as_ref().is_some_and(OccurrenceLatch::is_tripped)
    }
}

impl Detector for DebouncedDetector {
    fn code(&self) -> FaultCode {
        self.code
    }

    fn diagnose(&mut self, snapshot: &InputSnapshot, current: FaultStatus) -> Verdict {
        let fault_active = (self.fault_condition)(snapshot);
        let recovery_active = !fault_active
            && current.is_confirmed()
            && !self.latch_tripped()
            && (self.recovery_condition)(snapshot);

        let status = self
            .debouncer
            .step(current, fault_active, recovery_active, self.params);

        trace!(
            code = %self.code,
            fault_active,
            recovery_active,
            confirm_count = self.debouncer.confirm_count(),
            recovery_count = self.debouncer.recovery_count(),
            "debounce step"
        );

        let lockout = match self.latch.as_mut() {
            Some(latch) => latch.record(current, status),
            None => false,
        };

        Verdict { status, lockout }
    }

    fn reset(&mut self) {
        self.debouncer.reset();
        if let Some(latch) = self.latch.as_mut() {
            latch.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::conditions;
    use crate::snapshot::{PhaseCurrents, SequenceState};

    fn overcurrent_detector() -> DebouncedDetector {
        DebouncedDetector::new(
            FaultCode::InputOvercurrent,
            DebounceParams::new(10, 10),
            conditions::input_overcurrent,
            conditions::input_overcurrent_cleared,
        )
    }

    fn charging_at(current: f32) -> InputSnapshot {
        InputSnapshot {
            seq_state: SequenceState::Charging,
            phase_currents: PhaseCurrents::balanced(current),
            ..Default::default()
        }
    }

    fn run(
        detector: &mut DebouncedDetector,
        snapshot: &InputSnapshot,
        status: &mut FaultStatus,
        cycles: usize,
    ) -> bool {
        let mut lockout = false;
        for _ in 0..cycles {
            let verdict = detector.diagnose(snapshot, *status);
            *status = verdict.status;
            lockout |= verdict.lockout;
        }
        lockout
    }

    #[test]
    fn overcurrent_confirms_on_tenth_cycle() {
        let mut detector = overcurrent_detector();
        let mut status = FaultStatus::Normal;
        let hot = charging_at(35.0);

        run(&mut detector, &hot, &mut status, 9);
        assert_eq!(status, FaultStatus::Detect);
        run(&mut detector, &hot, &mut status, 1);
        assert_eq!(status, FaultStatus::Confirm);
    }

    #[test]
    fn band_between_thresholds_holds_confirm() {
        let mut detector = overcurrent_detector();
        let mut status = FaultStatus::Confirm;
        run(&mut detector, &charging_at(28.0), &mut status, 50);
        assert_eq!(status, FaultStatus::Confirm);
        assert_eq!(detector.debouncer().recovery_count(), 0);
    }

    #[test]
    fn latching_detector_requests_lockout_on_third_entry() {
        let mut detector = DebouncedDetector::new(
            FaultCode::PlugPower,
            DebounceParams::new(1, 1),
            conditions::plug_power_lost,
            conditions::plug_power_restored,
        )
        .with_lockout(3);

        let lost = InputSnapshot {
            seq_state: SequenceState::Charging,
            ..Default::default()
        };
        let restored = InputSnapshot {
            seq_state: SequenceState::Wait,
            plug_info: crate::snapshot::PlugInfo::ConnectedPaid,
            ..Default::default()
        };

        let mut status = FaultStatus::Normal;
        for entry in 1..=3u8 {
            let lockout = run(&mut detector, &lost, &mut status, 2);
            assert_eq!(status, FaultStatus::Confirm);
            assert_eq!(detector.occurrences(), Some(entry));
            assert_eq!(lockout, entry == 3);
            run(&mut detector, &restored, &mut status, 1);
        }

        // Tripped latch blocks self-recovery.
        assert_eq!(status, FaultStatus::Confirm);

        detector.reset();
        assert_eq!(detector.occurrences(), Some(0));
    }

    #[test]
    fn non_latching_detector_reports_no_occurrences() {
        assert_eq!(overcurrent_detector().occurrences(), None);
    }
}
