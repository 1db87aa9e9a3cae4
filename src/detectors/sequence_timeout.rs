//! Sequence timeout detector (0x0B).
//!
//! Measures how long the charging sequence has dwelt in its current state.
//! INIT, WAIT, FAULT and RESET time out once the dwell reaches the short
//! limit; CHARGING times out once it exceeds the full-charge limit; SHUTDOWN
//! never times out. A timeout confirms immediately. Returning to INIT clears
//! a confirmed timeout. Every entry into CONFIRM counts towards the lockout.

use crate::config::SequenceTimeoutConfig;
use crate::debounce::OccurrenceLatch;
use crate::fault::{FaultCode, FaultStatus};
use crate::snapshot::{InputSnapshot, SequenceState};
use crate::traits::{Detector, Verdict};

#[derive(Debug, Clone)]
pub struct SequenceTimeoutDetector {
    config: SequenceTimeoutConfig,
    latch: OccurrenceLatch,
    dwell_state: Option<SequenceState>,
    dwell_cycles: u32,
}

impl SequenceTimeoutDetector {
    pub fn new(config: SequenceTimeoutConfig, lockout_occurrences: u8) -> Self {
        Self {
            config,
            latch: OccurrenceLatch::new(lockout_occurrences),
            dwell_state: None,
            dwell_cycles: 0,
        }
    }

    /// Cycles spent in the current sequence state, counting the entry cycle.
    pub fn dwell_cycles(&self) -> u32 {
        self.dwell_cycles
    }

    pub fn occurrences(&self) -> u8 {
        self.latch.entries()
    }

    fn timed_out(&self, state: SequenceState) -> bool {
        match state {
            SequenceState::Init
            | SequenceState::Wait
            | SequenceState::Fault
            | SequenceState::Reset => self.dwell_cycles >= self.config.short_state_limit,
            SequenceState::Charging => self.dwell_cycles > self.config.charging_limit,
            SequenceState::Shutdown => false,
        }
    }
}

impl Detector for SequenceTimeoutDetector {
    fn code(&self) -> FaultCode {
        FaultCode::SequenceTimeout
    }

    fn diagnose(&mut self, snapshot: &InputSnapshot, current: FaultStatus) -> Verdict {
        // Restart inhibited: stay confirmed and keep requesting the lockout.
        if self.latch.is_tripped() {
            return Verdict {
                status: FaultStatus::Confirm,
                lockout: true,
            };
        }

        let state = snapshot.seq_state;
        if self.dwell_state == Some(state) {
            self.dwell_cycles = self.dwell_cycles.saturating_add(1);
        } else {
            self.dwell_state = Some(state);
            self.dwell_cycles = 1;
        }

        let status = if self.timed_out(state) {
            FaultStatus::Confirm
        } else if current.is_confirmed() && state == SequenceState::Init {
            self.dwell_cycles = 1;
            FaultStatus::Normal
        } else {
            current
        };

        let lockout = self.latch.record(current, status);
        Verdict { status, lockout }
    }

    fn reset(&mut self) {
        self.latch.reset();
        self.dwell_state = None;
        self.dwell_cycles = 0;
    }
}
