//! Fault codes, fault status and status transitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::error::ObcError;
use crate::types::Cycle;

/// Number of fault codes monitored by the engine.
pub const FAULT_CODE_COUNT: usize = 12;

/// Closed set of on-board charger fault codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FaultCode {
    InputOvercurrent = 0x01,
    InputUndercurrent = 0x02,
    PlugPower = 0x03,
    RelayMismatch = 0x04,
    BmsVoltageMismatch = 0x05,
    OverTemperature = 0x06,
    CanTimeout = 0x07,
    IsolationResistance = 0x08,
    Payment = 0x09,
    Watchdog = 0x0A,
    SequenceTimeout = 0x0B,
    TemperatureSensor = 0x0C,
}

impl FaultCode {
    /// Every fault code in diagnosis order.
    pub const ALL: [FaultCode; FAULT_CODE_COUNT] = [
        FaultCode::InputOvercurrent,
        FaultCode::InputUndercurrent,
        FaultCode::PlugPower,
        FaultCode::RelayMismatch,
        FaultCode::BmsVoltageMismatch,
        FaultCode::OverTemperature,
        FaultCode::CanTimeout,
        FaultCode::IsolationResistance,
        FaultCode::Payment,
        FaultCode::Watchdog,
        FaultCode::SequenceTimeout,
        FaultCode::TemperatureSensor,
    ];

    /// Raw fault code (0x01..=0x0C).
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Zero-based position in [`FaultCode::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    /// Human-readable fault name.
    pub const fn name(self) -> &'static str {
        match self {
            FaultCode::InputOvercurrent => "Input Overcurrent",
            FaultCode::InputUndercurrent => "Input Undercurrent",
            FaultCode::PlugPower => "Plug Power Error",
            FaultCode::RelayMismatch => "Relay Error",
            FaultCode::BmsVoltageMismatch => "BMS Voltage Mismatch",
            FaultCode::OverTemperature => "Over Temperature",
            FaultCode::CanTimeout => "CAN Communication Timeout",
            FaultCode::IsolationResistance => "Isolation Resistance Error",
            FaultCode::Payment => "Payment Error",
            FaultCode::Watchdog => "Watchdog Error",
            FaultCode::SequenceTimeout => "Sequence Timeout",
            FaultCode::TemperatureSensor => "Temperature Sensor Error",
        }
    }
}

impl TryFrom<u8> for FaultCode {
    type Error = ObcError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01..=0x0C => Ok(FaultCode::ALL[usize::from(value) - 1]),
            _ => Err(ObcError::InvalidFaultCode(value)),
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.code())
    }
}

impl FromStr for FaultCode {
    type Err = ObcError;

    /// Accepts `0x0B`, `0X0b` or bare hex digits such as `0B`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let value = u8::from_str_radix(digits, 16)
            .map_err(|_| ObcError::UnrecognisedFaultCode(s.to_string()))?;
        FaultCode::try_from(value)
    }
}

/// Health state of one fault code.
///
/// Ordered as a severity progression `Normal < Detect < Confirm`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum FaultStatus {
    /// No fault condition present.
    #[default]
    Normal,
    /// Fault condition present but not yet debounced.
    Detect,
    /// Fault confirmed; requires action by the control layer.
    Confirm,
}

impl FaultStatus {
    /// Export encoding: NORMAL=0, DETECT=1, CONFIRM=2.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        match self {
            FaultStatus::Normal => 0,
            FaultStatus::Detect => 1,
            FaultStatus::Confirm => 2,
        }
    }

    #[inline]
    pub const fn is_confirmed(self) -> bool {
        matches!(self, FaultStatus::Confirm)
    }
}

impl TryFrom<u8> for FaultStatus {
    type Error = ObcError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FaultStatus::Normal),
            1 => Ok(FaultStatus::Detect),
            2 => Ok(FaultStatus::Confirm),
            other => Err(ObcError::InvalidFaultStatus(other)),
        }
    }
}

impl fmt::Display for FaultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultStatus::Normal => "NORMAL",
            FaultStatus::Detect => "DETECT",
            FaultStatus::Confirm => "CONFIRM",
        };
        f.write_str(name)
    }
}

/// A status change of one fault code during one diagnosis cycle.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultTransition {
    pub cycle: Cycle,
    #[serde_as(as = "DisplayFromStr")]
    pub code: FaultCode,
    pub from: FaultStatus,
    pub to: FaultStatus,
}

impl FaultTransition {
    /// True when this transition leaves CONFIRM or DETECT for NORMAL.
    pub fn is_cleared(&self) -> bool {
        self.to == FaultStatus::Normal
    }
}

impl fmt::Display for FaultTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}): {} -> {}",
            self.cycle,
            self.code,
            self.code.name(),
            self.from,
            self.to
        )
    }
}
