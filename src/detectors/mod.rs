//! The bank of fault detectors, one per [`FaultCode`].
//!
//! [`build_detectors`] maps every fault code to its detector instance and
//! parameters. Most codes share the [`DebouncedDetector`]; the payment,
//! watchdog and sequence-timeout codes have their own state machines.

pub mod conditions;
pub mod debounced;
pub mod payment;
pub mod sequence_timeout;
pub mod watchdog;

pub use debounced::DebouncedDetector;
pub use payment::PaymentDetector;
pub use sequence_timeout::SequenceTimeoutDetector;
pub use watchdog::WatchdogDetector;

use crate::config::EngineConfig;
use crate::constants::{
    DEBOUNCE_IMMEDIATE, DEBOUNCE_LONG_CYCLES, DEBOUNCE_SENSOR_CYCLES, DEBOUNCE_SHORT_CYCLES,
};
use crate::debounce::DebounceParams;
use crate::fault::FaultCode;
use crate::traits::Detector;

/// Creates one detector per fault code, in [`FaultCode::ALL`] order.
pub fn build_detectors(config: &EngineConfig) -> Vec<Box<dyn Detector>> {
    let long = DebounceParams::new(DEBOUNCE_LONG_CYCLES, DEBOUNCE_LONG_CYCLES);
    let short = DebounceParams::new(DEBOUNCE_SHORT_CYCLES, DEBOUNCE_SHORT_CYCLES);
    let immediate = DebounceParams::new(DEBOUNCE_IMMEDIATE, DEBOUNCE_IMMEDIATE);

    let detectors: Vec<Box<dyn Detector>> = vec![
        Box::new(DebouncedDetector::new(
            FaultCode::InputOvercurrent,
            long,
            conditions::input_overcurrent,
            conditions::input_overcurrent_cleared,
        )),
        Box::new(DebouncedDetector::new(
            FaultCode::InputUndercurrent,
            long,
            conditions::input_undercurrent,
            conditions::input_undercurrent_cleared,
        )),
        Box::new(
            DebouncedDetector::new(
                FaultCode::PlugPower,
                immediate,
                conditions::plug_power_lost,
                conditions::plug_power_restored,
            )
            .with_lockout(config.lockout_occurrences),
        ),
        Box::new(DebouncedDetector::new(
            FaultCode::RelayMismatch,
            immediate,
            conditions::relay_flags_agree,
            conditions::relay_flags_differ,
        )),
        Box::new(DebouncedDetector::new(
            FaultCode::BmsVoltageMismatch,
            long,
            conditions::bms_voltage_mismatch,
            conditions::bms_voltage_restored,
        )),
        Box::new(
            DebouncedDetector::new(
                FaultCode::OverTemperature,
                DebounceParams::new(DEBOUNCE_LONG_CYCLES, DEBOUNCE_IMMEDIATE),
                conditions::over_temperature,
                conditions::over_temperature_cooled,
            )
            .with_lockout(config.lockout_occurrences),
        ),
        Box::new(DebouncedDetector::new(
            FaultCode::CanTimeout,
            short,
            conditions::can_message_missing,
            conditions::can_message_present,
        )),
        Box::new(DebouncedDetector::new(
            FaultCode::IsolationResistance,
            long,
            conditions::isolation_low,
            conditions::isolation_restored,
        )),
        Box::new(PaymentDetector::new(DEBOUNCE_SHORT_CYCLES)),
        Box::new(WatchdogDetector::new(config.watchdog)),
        Box::new(SequenceTimeoutDetector::new(
            config.sequence_timeout,
            config.lockout_occurrences,
        )),
        Box::new(DebouncedDetector::new(
            FaultCode::TemperatureSensor,
            DebounceParams::new(DEBOUNCE_SENSOR_CYCLES, DEBOUNCE_IMMEDIATE),
            conditions::temperature_sensor_implausible,
            conditions::temperature_sensor_plausible_at_init,
        )),
    ];

    debug_assert!(
        detectors
            .iter()
            .map(|d| d.code())
            .eq(FaultCode::ALL.iter().copied()),
        "detector bank out of fault-code order"
    );
    detectors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_detector_per_code_in_order() {
        let detectors = build_detectors(&EngineConfig::default());
        let codes: Vec<FaultCode> = detectors.iter().map(|d| d.code()).collect();
        assert_eq!(codes, FaultCode::ALL.to_vec());
    }
}
