//! Telemetry CSV reader producing one [`InputSnapshot`] per row.
//!
//! The first line is a header and is skipped. Each data row carries 15
//! comma-separated columns:
//!
//! ```text
//! Cycle,SeqState,PlugInfo,FLAG_Stop,FLAG_Relay,Ia,Ib,Ic,FaultState,Charg_Cnt,
//! Real_V,Exp_V,H,CanMsg,IsoR
//! ```
//!
//! `FaultState` is the upstream controller's own verdict and is ignored.
//! Flags are true when non-zero. Range checks on measured values are left to
//! the data source; only the enumerated codes are validated.

use std::io::BufRead;
use std::str::FromStr;

use crate::error::{ObcError, SnapshotParseError};
use crate::snapshot::{InputSnapshot, PhaseCurrents, PlugInfo, SequenceState};
use crate::types::{ChargeCount, Cycle};

/// Number of columns in a telemetry row.
pub const TELEMETRY_FIELD_COUNT: usize = 15;

const COLUMN_NAMES: [&str; TELEMETRY_FIELD_COUNT] = [
    "Cycle",
    "SeqState",
    "PlugInfo",
    "FLAG_Stop",
    "FLAG_Relay",
    "Ia",
    "Ib",
    "Ic",
    "FaultState",
    "Charg_Cnt",
    "Real_V",
    "Exp_V",
    "H",
    "CanMsg",
    "IsoR",
];

fn parse_field<T: FromStr>(
    fields: &[&str],
    index: usize,
    line: usize,
) -> Result<T, SnapshotParseError> {
    let raw = fields[index];
    raw.parse::<T>()
        .map_err(|_| SnapshotParseError::InvalidNumber {
            line,
            column: COLUMN_NAMES[index],
            value: raw.to_string(),
        })
}

fn parse_flag(fields: &[&str], index: usize, line: usize) -> Result<bool, SnapshotParseError> {
    parse_field::<i64>(fields, index, line).map(|value| value != 0)
}

/// Parses one data row into a snapshot.
///
/// # Parameters
/// - `text`: The row, without trailing newline (a trailing `\r` is tolerated).
/// - `line`: 1-based line number used in error reports.
///
/// # Errors
/// - [`SnapshotParseError::WrongFieldCount`] - Not exactly 15 fields
/// - [`SnapshotParseError::InvalidNumber`] - A field is not numeric
/// - [`SnapshotParseError::InvalidSequenceState`] - SeqState outside 0..=5
/// - [`SnapshotParseError::InvalidPlugInfo`] - PlugInfo outside 0..=2
pub fn parse_snapshot_line(text: &str, line: usize) -> Result<InputSnapshot, SnapshotParseError> {
    let fields: Vec<&str> = text.trim_end().split(',').map(str::trim).collect();
    if fields.len() != TELEMETRY_FIELD_COUNT {
        return Err(SnapshotParseError::WrongFieldCount {
            line,
            expected: TELEMETRY_FIELD_COUNT,
            got: fields.len(),
        });
    }

    let seq_code: i64 = parse_field(&fields, 1, line)?;
    let seq_state = SequenceState::from_code(seq_code).ok_or(
        SnapshotParseError::InvalidSequenceState {
            line,
            value: seq_code,
        },
    )?;
    let plug_code: i64 = parse_field(&fields, 2, line)?;
    let plug_info = PlugInfo::from_code(plug_code).ok_or(SnapshotParseError::InvalidPlugInfo {
        line,
        value: plug_code,
    })?;

    // Column 8 (FaultState) is still checked for being numeric.
    let _: i64 = parse_field(&fields, 8, line)?;

    Ok(InputSnapshot {
        cycle: Cycle::new(parse_field(&fields, 0, line)?),
        seq_state,
        plug_info,
        stop_flag: parse_flag(&fields, 3, line)?,
        relay_flag: parse_flag(&fields, 4, line)?,
        phase_currents: PhaseCurrents {
            ia: parse_field(&fields, 5, line)?,
            ib: parse_field(&fields, 6, line)?,
            ic: parse_field(&fields, 7, line)?,
        },
        charge_cycle_count: ChargeCount::new(parse_field(&fields, 9, line)?),
        battery_real_voltage: parse_field(&fields, 10, line)?,
        battery_expected_voltage: parse_field(&fields, 11, line)?,
        temperature: parse_field(&fields, 12, line)?,
        can_message_received: parse_flag(&fields, 13, line)?,
        isolation_resistance: parse_field(&fields, 14, line)?,
    })
}

/// Iterator over the snapshots of a telemetry CSV stream.
///
/// Blank lines are skipped. Iteration yields an error for the first
/// malformed row; callers decide whether to stop or continue.
#[derive(Debug)]
pub struct SnapshotReader<R> {
    reader: R,
    line: usize,
    header_consumed: bool,
    buffer: String,
}

impl<R: BufRead> SnapshotReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            header_consumed: false,
            buffer: String::new(),
        }
    }

    /// 1-based number of the last line read.
    pub fn line(&self) -> usize {
        self.line
    }

    fn read_line(&mut self) -> Result<bool, ObcError> {
        self.buffer.clear();
        let read = self.reader.read_line(&mut self.buffer)?;
        if read == 0 {
            return Ok(false);
        }
        self.line += 1;
        Ok(true)
    }

    fn next_snapshot(&mut self) -> Result<Option<InputSnapshot>, ObcError> {
        if !self.header_consumed {
            if !self.read_line()? {
                return Err(SnapshotParseError::MissingHeader.into());
            }
            self.header_consumed = true;
        }

        loop {
            if !self.read_line()? {
                return Ok(None);
            }
            if self.buffer.trim().is_empty() {
                continue;
            }
            return Ok(Some(parse_snapshot_line(&self.buffer, self.line)?));
        }
    }
}

impl<R: BufRead> Iterator for SnapshotReader<R> {
    type Item = Result<InputSnapshot, ObcError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_snapshot().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Cycle,SeqState,PlugInfo,FLAG_Stop,FLAG_Relay,Ia,Ib,Ic,FaultState,Charg_Cnt,Real_Battery_Voltage,Expected Battery_Voltage,H,CanMsg_Received,IsoR";

    #[test]
    fn parses_full_row() {
        let snapshot =
            parse_snapshot_line("13,2,2,0,1,11,10,9.5,0,1,400,400,15,1,800000", 2).unwrap();
        assert_eq!(snapshot.cycle, 13);
        assert_eq!(snapshot.seq_state, SequenceState::Charging);
        assert_eq!(snapshot.plug_info, PlugInfo::ConnectedPaid);
        assert!(!snapshot.stop_flag);
        assert!(snapshot.relay_flag);
        assert_eq!(snapshot.phase_currents.ic, 9.5);
        assert_eq!(snapshot.charge_cycle_count, 1);
        assert_eq!(snapshot.temperature, 15);
        assert!(snapshot.can_message_received);
        assert_eq!(snapshot.isolation_resistance, 800000);
    }

    #[test]
    fn tolerates_crlf_and_spaces() {
        let snapshot =
            parse_snapshot_line("1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 398, 400, -5, 1, 900\r\n", 2)
                .unwrap();
        assert_eq!(snapshot.temperature, -5);
        assert_eq!(snapshot.isolation_resistance, 900);
    }

    #[test]
    fn accepts_negative_cycle() {
        let snapshot = parse_snapshot_line("-3,2,2,0,1,20,20,20,0,1,400,400,30,1,800", 2).unwrap();
        assert_eq!(snapshot.cycle, -3);
        assert_eq!(snapshot.cycle.gap_since(Cycle::INITIAL), -3);
    }

    #[test]
    fn rejects_short_row() {
        let err = parse_snapshot_line("1,0,0", 7).unwrap_err();
        assert_eq!(
            err,
            SnapshotParseError::WrongFieldCount {
                line: 7,
                expected: 15,
                got: 3
            }
        );
    }

    #[test]
    fn rejects_unknown_sequence_state() {
        let err = parse_snapshot_line("1,9,0,1,0,0,0,0,0,0,400,400,20,1,900", 3).unwrap_err();
        assert_eq!(
            err,
            SnapshotParseError::InvalidSequenceState { line: 3, value: 9 }
        );
    }

    #[test]
    fn names_the_bad_column() {
        let err = parse_snapshot_line("1,0,0,1,0,x,0,0,0,0,400,400,20,1,900", 5).unwrap_err();
        assert_eq!(
            err,
            SnapshotParseError::InvalidNumber {
                line: 5,
                column: "Ia",
                value: "x".to_string()
            }
        );
    }

    #[test]
    fn reader_skips_header_and_blank_lines() {
        let data = format!(
            "{HEADER}\n1,0,0,1,0,0,0,0,0,0,398,400,15,1,800000\n\n2,1,1,1,0,0,0,0,0,0,399,400,15,1,800000\n"
        );
        let snapshots: Vec<InputSnapshot> = SnapshotReader::new(Cursor::new(data))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[1].seq_state, SequenceState::Wait);
        assert_eq!(snapshots[1].plug_info, PlugInfo::ConnectedNoPay);
    }

    #[test]
    fn reader_reports_line_numbers() {
        let data = format!("{HEADER}\n1,0,0,1,0,0,0,0,0,0,398,400,15,1,800000\n2,0,5\n");
        let mut reader = SnapshotReader::new(Cursor::new(data));
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ObcError::Parse(SnapshotParseError::WrongFieldCount { line: 3, .. })
        ));
    }

    #[test]
    fn empty_input_is_missing_header() {
        let mut reader = SnapshotReader::new(Cursor::new(""));
        let err = reader.next().unwrap().unwrap_err();
        assert_eq!(err, ObcError::Parse(SnapshotParseError::MissingHeader));
    }

    #[test]
    fn header_only_yields_nothing() {
        let mut reader = SnapshotReader::new(Cursor::new(format!("{HEADER}\n")));
        assert!(reader.next().is_none());
        assert_eq!(reader.line(), 1);
    }
}
