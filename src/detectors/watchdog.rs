//! Heartbeat watchdog detector (0x0A).
//!
//! Tracks the previous cycle number. A gap of exactly one is healthy and
//! clears the accumulated delay. A single gap above the configured maximum
//! confirms at once. Smaller gaps add their size to the accumulated delay,
//! and stalls or regressions add one; the fault confirms once the
//! accumulated delay reaches its limit. CONFIRM is permanent.

use tracing::debug;

use crate::config::WatchdogConfig;
use crate::fault::{FaultCode, FaultStatus};
use crate::snapshot::InputSnapshot;
use crate::traits::{Detector, Verdict};
use crate::types::Cycle;

#[derive(Debug, Clone)]
pub struct WatchdogDetector {
    config: WatchdogConfig,
    previous_cycle: Option<Cycle>,
    accumulated_delay: u32,
    latched: bool,
}

impl WatchdogDetector {
    pub fn new(config: WatchdogConfig) -> Self {
        Self {
            config,
            previous_cycle: None,
            accumulated_delay: 0,
            latched: false,
        }
    }

    pub fn accumulated_delay(&self) -> u32 {
        self.accumulated_delay
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    fn confirm(&mut self, gap: i64) -> Verdict {
        debug!(
            gap,
            accumulated_delay = self.accumulated_delay,
            "watchdog heartbeat lost"
        );
        self.latched = true;
        Verdict::status(FaultStatus::Confirm)
    }
}

impl Detector for WatchdogDetector {
    fn code(&self) -> FaultCode {
        FaultCode::Watchdog
    }

    fn diagnose(&mut self, snapshot: &InputSnapshot, current: FaultStatus) -> Verdict {
        if self.latched {
            return Verdict::status(FaultStatus::Confirm);
        }

        // First call after init only establishes the baseline.
        let Some(previous) = self.previous_cycle.replace(snapshot.cycle) else {
            return Verdict::status(current);
        };

        let gap = snapshot.cycle.gap_since(previous);
        if gap == 1 {
            self.accumulated_delay = 0;
        } else if gap > self.config.max_single_gap {
            return self.confirm(gap);
        } else if gap > 1 {
            let delay = u32::try_from(gap).unwrap_or(u32::MAX);
            self.accumulated_delay = self.accumulated_delay.saturating_add(delay);
        } else {
            self.accumulated_delay = self.accumulated_delay.saturating_add(1);
        }

        if self.accumulated_delay >= self.config.max_accumulated_delay {
            return self.confirm(gap);
        }
        Verdict::status(FaultStatus::Normal)
    }

    fn reset(&mut self) {
        self.previous_cycle = None;
        self.accumulated_delay = 0;
        self.latched = false;
    }
}
