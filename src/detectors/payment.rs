//! Payment fault detector (0x09).
//!
//! Two entry paths: an unpaid connected plug accumulates towards CONFIRM,
//! while a paid plug that does not start charging confirms at once. A paid
//! charging session, or a return to INIT, clears the fault immediately and
//! takes precedence over both entry paths.

use crate::fault::{FaultCode, FaultStatus};
use crate::snapshot::{InputSnapshot, PlugInfo, SequenceState};
use crate::traits::{Detector, Verdict};

#[derive(Debug, Clone)]
pub struct PaymentDetector {
    unpaid_confirm_threshold: u8,
    unpaid_count: u8,
}

impl PaymentDetector {
    pub fn new(unpaid_confirm_threshold: u8) -> Self {
        Self {
            unpaid_confirm_threshold,
            unpaid_count: 0,
        }
    }

    /// Cycles counted towards CONFIRM with an unpaid connected plug.
    pub fn unpaid_count(&self) -> u8 {
        self.unpaid_count
    }

    fn cleared(snapshot: &InputSnapshot) -> bool {
        (snapshot.plug_info == PlugInfo::ConnectedPaid && snapshot.is_charging())
            || snapshot.seq_state == SequenceState::Init
    }
}

impl Detector for PaymentDetector {
    fn code(&self) -> FaultCode {
        FaultCode::Payment
    }

    fn diagnose(&mut self, snapshot: &InputSnapshot, current: FaultStatus) -> Verdict {
        if Self::cleared(snapshot) {
            self.unpaid_count = 0;
            return Verdict::status(FaultStatus::Normal);
        }

        let status = match snapshot.plug_info {
            PlugInfo::ConnectedNoPay => {
                self.unpaid_count = self.unpaid_count.saturating_add(1);
                if self.unpaid_count >= self.unpaid_confirm_threshold {
                    FaultStatus::Confirm
                } else {
                    FaultStatus::Detect
                }
            }
            // Not charging here, otherwise `cleared` would have matched.
            PlugInfo::ConnectedPaid => FaultStatus::Confirm,
            PlugInfo::Unplugged => current,
        };
        Verdict::status(status)
    }

    fn reset(&mut self) {
        self.unpaid_count = 0;
    }
}
