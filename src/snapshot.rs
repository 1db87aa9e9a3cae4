//! Per-cycle input snapshot consumed by the diagnosis engine.
//!
//! An [`InputSnapshot`] is built once per measurement cycle by the data
//! source (see [`crate::input`]) and handed to
//! [`DiagnosisEngine::diagnose_all`](crate::engine::DiagnosisEngine::diagnose_all)
//! by reference. The engine never mutates it and never validates it: values
//! are taken at face value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ChargeCount, Cycle};

/// State of the charging sequence controller at the time of measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SequenceState {
    /// Relays off, all variables initialised.
    #[default]
    Init,
    /// Waiting for plug connection and payment.
    Wait,
    /// Charging current is flowing.
    Charging,
    /// Protection active, charging forcibly stopped.
    Fault,
    /// Recovery attempt after a fault.
    Reset,
    /// Session finished.
    Shutdown,
}

impl SequenceState {
    /// Decodes the raw telemetry code (0..=5).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Init),
            1 => Some(Self::Wait),
            2 => Some(Self::Charging),
            3 => Some(Self::Fault),
            4 => Some(Self::Reset),
            5 => Some(Self::Shutdown),
            _ => None,
        }
    }

    /// Raw telemetry code.
    pub fn code(self) -> u8 {
        match self {
            Self::Init => 0,
            Self::Wait => 1,
            Self::Charging => 2,
            Self::Fault => 3,
            Self::Reset => 4,
            Self::Shutdown => 5,
        }
    }
}

impl fmt::Display for SequenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "INIT",
            Self::Wait => "WAIT",
            Self::Charging => "CHARGING",
            Self::Fault => "FAULT",
            Self::Reset => "RESET",
            Self::Shutdown => "SHUTDOWN",
        };
        f.write_str(name)
    }
}

/// Plug connection and payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlugInfo {
    /// No plug connected.
    #[default]
    Unplugged,
    /// Plug connected, payment outstanding.
    ConnectedNoPay,
    /// Plug connected and session paid.
    ConnectedPaid,
}

impl PlugInfo {
    /// Decodes the raw telemetry code (0..=2).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unplugged),
            1 => Some(Self::ConnectedNoPay),
            2 => Some(Self::ConnectedPaid),
            _ => None,
        }
    }

    /// Raw telemetry code.
    pub fn code(self) -> u8 {
        match self {
            Self::Unplugged => 0,
            Self::ConnectedNoPay => 1,
            Self::ConnectedPaid => 2,
        }
    }
}

/// Input phase currents in amperes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseCurrents {
    pub ia: f32,
    pub ib: f32,
    pub ic: f32,
}

impl PhaseCurrents {
    /// Same current on all three phases.
    pub const fn balanced(current: f32) -> Self {
        Self {
            ia: current,
            ib: current,
            ic: current,
        }
    }

    /// True when every phase is strictly above `limit`.
    #[inline]
    pub fn all_above(&self, limit: f32) -> bool {
        self.ia > limit && self.ib > limit && self.ic > limit
    }

    /// True when every phase is strictly below `limit`.
    #[inline]
    pub fn all_below(&self, limit: f32) -> bool {
        self.ia < limit && self.ib < limit && self.ic < limit
    }
}

/// One immutable measurement record for a single control cycle.
///
/// `Default` yields an idle snapshot: cycle 0, sequence INIT, unplugged,
/// both control flags low, zero currents and no CAN traffic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub cycle: Cycle,
    pub seq_state: SequenceState,
    pub plug_info: PlugInfo,
    /// Main relay commanded closed.
    pub relay_flag: bool,
    /// Charging stop requested.
    pub stop_flag: bool,
    pub phase_currents: PhaseCurrents,
    pub charge_cycle_count: ChargeCount,
    pub battery_real_voltage: i32,
    pub battery_expected_voltage: i32,
    pub temperature: i32,
    pub can_message_received: bool,
    pub isolation_resistance: i32,
}

impl InputSnapshot {
    /// True when the sequence controller reports CHARGING.
    #[inline]
    pub fn is_charging(&self) -> bool {
        self.seq_state == SequenceState::Charging
    }

    /// Absolute difference between real and expected battery voltage.
    #[inline]
    pub fn battery_voltage_deviation(&self) -> u32 {
        self.battery_real_voltage
            .abs_diff(self.battery_expected_voltage)
    }
}
