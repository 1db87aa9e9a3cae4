//! Diagnosis thresholds and limits for the on-board charger fault set.
//!
//! Values follow the canonical detector table. Currents are in amperes,
//! voltages in volts, temperatures in degrees Celsius and isolation
//! resistance in kilo-ohms as delivered by the telemetry source.

// --- Debounce (cycles) ---

/// Confirm/recovery threshold used by most debounced detectors.
pub const DEBOUNCE_LONG_CYCLES: u8 = 10;
/// Confirm/recovery threshold for the CAN timeout and payment detectors.
pub const DEBOUNCE_SHORT_CYCLES: u8 = 5;
/// Confirm threshold for the temperature sensor plausibility detector.
pub const DEBOUNCE_SENSOR_CYCLES: u8 = 3;
/// Threshold for detectors that act on the first qualifying cycle.
pub const DEBOUNCE_IMMEDIATE: u8 = 1;

// --- Input current (0x01, 0x02) ---

/// Phase current above which all three phases indicate overcurrent.
pub const OVERCURRENT_LIMIT_A: f32 = 32.0;
/// Phase current below which all three phases indicate overcurrent recovery.
pub const OVERCURRENT_RECOVERY_A: f32 = 24.0;
/// Phase current below which all three phases indicate undercurrent.
pub const UNDERCURRENT_LIMIT_A: f32 = 6.0;
/// Phase current above which all three phases indicate undercurrent recovery.
pub const UNDERCURRENT_RECOVERY_A: f32 = 12.0;
/// Phase current below which a paid, connected plug is considered unpowered.
pub const PLUG_POWER_LOSS_A: f32 = 0.0;

// --- Battery (0x05) ---

/// Charge cycles that must elapse before the voltage comparison is trusted.
pub const BMS_MIN_CHARGE_COUNT: u32 = 10;
/// Real/expected battery voltage difference that indicates a mismatch.
pub const BMS_VOLTAGE_MISMATCH_V: u32 = 10;
/// Real/expected battery voltage difference at or below which the BMS is healthy.
pub const BMS_VOLTAGE_RECOVERY_V: u32 = 5;

// --- Temperature (0x06, 0x0C) ---

/// Temperature above which the charger is overheating.
pub const OVER_TEMPERATURE_C: i32 = 60;
/// Temperature below which an overheated charger may restart from INIT.
pub const OVER_TEMPERATURE_RECOVERY_C: i32 = 20;
/// Lowest plausible temperature sensor reading.
pub const TEMPERATURE_SENSOR_MIN_C: i32 = -20;
/// Highest plausible temperature sensor reading.
pub const TEMPERATURE_SENSOR_MAX_C: i32 = 120;

// --- Isolation (0x08) ---

/// Isolation resistance below which insulation is considered broken.
pub const ISOLATION_MIN_KOHM: i32 = 500;
/// Isolation resistance above which insulation is considered restored.
pub const ISOLATION_RECOVERY_KOHM: i32 = 600;

// --- Watchdog (0x0A) ---

/// A single cycle gap larger than this confirms the watchdog fault at once.
pub const WATCHDOG_MAX_SINGLE_GAP: i64 = 10;
/// Accumulated heartbeat delay at which the watchdog fault confirms.
pub const WATCHDOG_MAX_ACCUMULATED_DELAY: u32 = 10;

// --- Sequence timeout (0x0B) ---

/// Dwell limit (cycles) for INIT, WAIT, FAULT and RESET.
pub const SEQUENCE_SHORT_STATE_LIMIT: u32 = 10;
/// Dwell limit (cycles) for CHARGING, one full charge.
pub const SEQUENCE_CHARGING_LIMIT: u32 = 3600;

// --- Lockout ---

/// Confirm entries of a latching fault after which the system locks out.
pub const LOCKOUT_OCCURRENCES: u8 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovery_bands_sit_inside_fault_bands() {
        assert!(OVERCURRENT_RECOVERY_A < OVERCURRENT_LIMIT_A);
        assert!(UNDERCURRENT_RECOVERY_A > UNDERCURRENT_LIMIT_A);
        assert!(BMS_VOLTAGE_RECOVERY_V < BMS_VOLTAGE_MISMATCH_V);
        assert!(OVER_TEMPERATURE_RECOVERY_C < OVER_TEMPERATURE_C);
        assert!(ISOLATION_RECOVERY_KOHM > ISOLATION_MIN_KOHM);
    }

    #[test]
    fn sensor_range_contains_operating_limits() {
        assert!(TEMPERATURE_SENSOR_MIN_C < OVER_TEMPERATURE_RECOVERY_C);
        assert!(TEMPERATURE_SENSOR_MAX_C > OVER_TEMPERATURE_C);
    }
}
