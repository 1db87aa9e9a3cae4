//! Common test utilities for diagnosis integration tests.
//!
//! This module provides shared helpers for building snapshots, driving an
//! engine through a scenario and rendering telemetry rows as CSV.
#![allow(dead_code)]

use obcdiag::snapshot::{PhaseCurrents, PlugInfo, SequenceState};
use obcdiag::{Cycle, DiagnosisEngine, FaultCode, FaultStatus, InputSnapshot};

/// Header line of a telemetry CSV as produced by the data logger.
pub const TELEMETRY_HEADER: &str = "Cycle,SeqState,PlugInfo,FLAG_Stop,FLAG_Relay,Ia,Ib,Ic,FaultState,Charg_Cnt,Real_Battery_Voltage,Expected Battery_Voltage,H,CanMsg_Received,IsoR";

/// Creates a snapshot of a paid, healthy charging session.
///
/// # Default values
/// - Sequence CHARGING, plug connected and paid
/// - Relay closed, stop flag clear, 20 A on every phase
/// - Battery 400 V real and expected, 30 °C, CAN present, 800 kΩ isolation
pub fn healthy_snapshot(cycle: i32) -> InputSnapshot {
    InputSnapshot {
        cycle: Cycle::new(cycle),
        seq_state: SequenceState::Charging,
        plug_info: PlugInfo::ConnectedPaid,
        relay_flag: true,
        stop_flag: false,
        phase_currents: PhaseCurrents::balanced(20.0),
        battery_real_voltage: 400,
        battery_expected_voltage: 400,
        temperature: 30,
        can_message_received: true,
        isolation_resistance: 800,
        ..Default::default()
    }
}

/// Creates a healthy snapshot with the given balanced phase current.
pub fn snapshot_with_current(cycle: i32, amps: f32) -> InputSnapshot {
    InputSnapshot {
        phase_currents: PhaseCurrents::balanced(amps),
        ..healthy_snapshot(cycle)
    }
}

/// Creates a healthy snapshot in the given sequence state.
pub fn snapshot_in_state(cycle: i32, seq_state: SequenceState) -> InputSnapshot {
    InputSnapshot {
        seq_state,
        ..healthy_snapshot(cycle)
    }
}

/// Runs `snapshots` through `engine` and returns the status of `code` after
/// each cycle.
pub fn trace_status<I>(engine: &mut DiagnosisEngine, code: FaultCode, snapshots: I) -> Vec<FaultStatus>
where
    I: IntoIterator<Item = InputSnapshot>,
{
    snapshots
        .into_iter()
        .map(|snapshot| {
            engine.diagnose_all(&snapshot);
            engine.status(code)
        })
        .collect()
}

/// Renders a snapshot as one telemetry CSV row (FaultState column zero).
pub fn to_csv_row(snapshot: &InputSnapshot) -> String {
    format!(
        "{},{},{},{},{},{},{},{},0,{},{},{},{},{},{}",
        snapshot.cycle.value(),
        snapshot.seq_state.code(),
        snapshot.plug_info.code(),
        u8::from(snapshot.stop_flag),
        u8::from(snapshot.relay_flag),
        snapshot.phase_currents.ia,
        snapshot.phase_currents.ib,
        snapshot.phase_currents.ic,
        snapshot.charge_cycle_count.value(),
        snapshot.battery_real_voltage,
        snapshot.battery_expected_voltage,
        snapshot.temperature,
        u8::from(snapshot.can_message_received),
        snapshot.isolation_resistance,
    )
}

/// Renders a complete telemetry CSV document, header included.
pub fn to_csv_document(snapshots: &[InputSnapshot]) -> String {
    let mut document = String::from(TELEMETRY_HEADER);
    document.push('\n');
    for snapshot in snapshots {
        document.push_str(&to_csv_row(snapshot));
        document.push('\n');
    }
    document
}

/// Asserts that every fault code except those in `faulted` is NORMAL.
pub fn assert_only_faults(engine: &DiagnosisEngine, faulted: &[FaultCode]) {
    for (code, status) in engine.statuses() {
        if !faulted.contains(&code) {
            assert_eq!(
                status,
                FaultStatus::Normal,
                "{code} ({}) unexpectedly {status}",
                code.name()
            );
        }
    }
}
