//! Fuzz testing harnesses for the diagnosis engine.
//!
//! The harnesses turn arbitrary bytes into a stream of snapshots and drive a
//! fresh [`DiagnosisEngine`] with it, asserting the engine's invariants after
//! every cycle. They are plain functions so any byte-oriented fuzzer (or a
//! property test) can call them.

use crate::engine::DiagnosisEngine;
use crate::fault::FaultCode;
use crate::snapshot::{InputSnapshot, PhaseCurrents, PlugInfo, SequenceState};
use crate::types::{ChargeCount, Cycle};

/// Bytes consumed per generated snapshot.
pub const SNAPSHOT_FUZZ_CHUNK: usize = 10;

/// Builds one snapshot from a fuzzer chunk.
///
/// The cycle is derived from `previous` plus a gap taken from the first byte,
/// so stalls, repeats and large jumps all occur. Out-of-range codes are
/// folded into their enums.
fn snapshot_from_chunk(chunk: &[u8; SNAPSHOT_FUZZ_CHUNK], previous: Cycle) -> InputSnapshot {
    let gap = i32::from(chunk[0] % 16) - 1;
    let seq_state = SequenceState::from_code(i64::from(chunk[1] % 6)).unwrap_or_default();
    let plug_info = PlugInfo::from_code(i64::from(chunk[2] % 3)).unwrap_or_default();
    let flags = chunk[3];

    InputSnapshot {
        cycle: Cycle::new(previous.value().saturating_add(gap)),
        seq_state,
        plug_info,
        stop_flag: flags & 0x01 != 0,
        relay_flag: flags & 0x02 != 0,
        can_message_received: flags & 0x04 != 0,
        phase_currents: PhaseCurrents {
            ia: f32::from(chunk[4] % 48),
            ib: f32::from(chunk[5] % 48),
            ic: f32::from(chunk[4].wrapping_add(chunk[5]) % 48),
        },
        charge_cycle_count: ChargeCount::new(u32::from(flags >> 3)),
        battery_real_voltage: 380 + i32::from(chunk[6] % 40),
        battery_expected_voltage: 400,
        temperature: i32::from(chunk[7]) - 40,
        isolation_resistance: i32::from(chunk[8]) * 8,
        ..Default::default()
    }
}

/// Drives a fresh engine with snapshots decoded from `data`.
///
/// # Invariants checked
/// - The lockout flag never clears once set
/// - After lockout no status changes and no transitions are reported
/// - Reported transitions always match the status table
pub fn diagnosis_engine_harness(data: &[u8]) {
    let mut engine = DiagnosisEngine::default();
    let mut cycle = Cycle::INITIAL;

    let (chunks, _) = data.as_chunks::<SNAPSHOT_FUZZ_CHUNK>();
    for chunk in chunks {
        let snapshot = snapshot_from_chunk(chunk, cycle);
        cycle = snapshot.cycle;

        let was_locked = engine.is_locked();
        let before = engine.status_table();
        engine.diagnose_all(&snapshot);

        if was_locked {
            assert!(engine.is_locked(), "lockout cleared by diagnosis");
            assert_eq!(before, engine.status_table(), "status changed after lockout");
            assert!(engine.last_transitions().is_empty());
        }

        for transition in engine.last_transitions() {
            assert_ne!(transition.from, transition.to);
            assert_eq!(before[transition.code.index()], transition.from);
            assert_eq!(engine.status(transition.code), transition.to);
        }

        // The watchdog latch is permanent within a session.
        if before[FaultCode::Watchdog.index()].is_confirmed() {
            assert!(engine.status(FaultCode::Watchdog).is_confirmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn harness_accepts_empty_and_short_input() {
        diagnosis_engine_harness(&[]);
        diagnosis_engine_harness(&[0xFF; SNAPSHOT_FUZZ_CHUNK - 1]);
    }

    #[test]
    fn harness_survives_saturated_bytes() {
        diagnosis_engine_harness(&[0xFF; SNAPSHOT_FUZZ_CHUNK * 64]);
    }

    #[test]
    fn chunk_gap_of_one_advances_cycle() {
        let chunk = [2, 2, 2, 0x06, 20, 20, 20, 70, 100, 0];
        let snapshot = snapshot_from_chunk(&chunk, Cycle::new(5));
        assert_eq!(snapshot.cycle, 6);
        assert_eq!(snapshot.seq_state, SequenceState::Charging);
        assert_eq!(snapshot.plug_info, PlugInfo::ConnectedPaid);
        assert!(snapshot.relay_flag);
        assert!(snapshot.can_message_received);
        assert!(!snapshot.stop_flag);
        assert_eq!(snapshot.temperature, 30);
    }

    #[quickcheck]
    fn harness_holds_for_arbitrary_bytes(data: Vec<u8>) -> bool {
        diagnosis_engine_harness(&data);
        true
    }
}
