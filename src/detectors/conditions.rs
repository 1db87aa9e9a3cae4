//! Fault and recovery predicates over a single snapshot.
//!
//! Each predicate is a plain function so detectors can be assembled from a
//! table of `(fault, recovery)` pairs.

use crate::constants::*;
use crate::snapshot::{InputSnapshot, PlugInfo, SequenceState};

/// Predicate evaluated once per cycle against the snapshot.
pub type Condition = fn(&InputSnapshot) -> bool;

// 0x01
pub fn input_overcurrent(s: &InputSnapshot) -> bool {
    s.is_charging() && s.phase_currents.all_above(OVERCURRENT_LIMIT_A)
}

pub fn input_overcurrent_cleared(s: &InputSnapshot) -> bool {
    s.phase_currents.all_below(OVERCURRENT_RECOVERY_A)
}

// 0x02
pub fn input_undercurrent(s: &InputSnapshot) -> bool {
    s.is_charging() && s.phase_currents.all_below(UNDERCURRENT_LIMIT_A)
}

pub fn input_undercurrent_cleared(s: &InputSnapshot) -> bool {
    s.phase_currents.all_above(UNDERCURRENT_RECOVERY_A)
}

// 0x03
/// Charging without a plug, or with a paid plug that delivers no current.
pub fn plug_power_lost(s: &InputSnapshot) -> bool {
    s.is_charging()
        && match s.plug_info {
            PlugInfo::Unplugged => true,
            PlugInfo::ConnectedPaid => s.phase_currents.all_below(PLUG_POWER_LOSS_A),
            PlugInfo::ConnectedNoPay => false,
        }
}

pub fn plug_power_restored(s: &InputSnapshot) -> bool {
    !s.is_charging() && s.plug_info == PlugInfo::ConnectedPaid
}

// 0x04
/// Relay and stop flags must always disagree: closed relay while running,
/// open relay while stopped.
pub fn relay_flags_agree(s: &InputSnapshot) -> bool {
    s.relay_flag == s.stop_flag
}

pub fn relay_flags_differ(s: &InputSnapshot) -> bool {
    s.relay_flag != s.stop_flag
}

// 0x05
pub fn bms_voltage_mismatch(s: &InputSnapshot) -> bool {
    s.is_charging()
        && s.charge_cycle_count > BMS_MIN_CHARGE_COUNT
        && s.battery_voltage_deviation() > BMS_VOLTAGE_MISMATCH_V
}

pub fn bms_voltage_restored(s: &InputSnapshot) -> bool {
    s.battery_voltage_deviation() <= BMS_VOLTAGE_RECOVERY_V
}

// 0x06
pub fn over_temperature(s: &InputSnapshot) -> bool {
    s.is_charging() && s.temperature > OVER_TEMPERATURE_C
}

pub fn over_temperature_cooled(s: &InputSnapshot) -> bool {
    s.seq_state == SequenceState::Init && s.temperature < OVER_TEMPERATURE_RECOVERY_C
}

// 0x07
pub fn can_message_missing(s: &InputSnapshot) -> bool {
    !s.can_message_received
}

pub fn can_message_present(s: &InputSnapshot) -> bool {
    s.can_message_received
}

// 0x08
pub fn isolation_low(s: &InputSnapshot) -> bool {
    s.is_charging() && s.isolation_resistance < ISOLATION_MIN_KOHM
}

pub fn isolation_restored(s: &InputSnapshot) -> bool {
    !s.is_charging() && s.isolation_resistance > ISOLATION_RECOVERY_KOHM
}

// 0x0C
fn temperature_plausible(temperature: i32) -> bool {
    (TEMPERATURE_SENSOR_MIN_C..=TEMPERATURE_SENSOR_MAX_C).contains(&temperature)
}

pub fn temperature_sensor_implausible(s: &InputSnapshot) -> bool {
    s.is_charging() && !temperature_plausible(s.temperature)
}

pub fn temperature_sensor_plausible_at_init(s: &InputSnapshot) -> bool {
    s.seq_state == SequenceState::Init && temperature_plausible(s.temperature)
}
