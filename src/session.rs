//! Per-file diagnosis sessions.
//!
//! A session re-initialises the engine, diagnoses every row of one telemetry
//! CSV and writes the matching result rows. Along the way it records each
//! fault transition and the row on which the permanent lockout engaged, so a
//! front end can report them after the fact.

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::engine::DiagnosisEngine;
use crate::error::ObcError;
use crate::export::ResultWriter;
use crate::fault::{FaultCode, FaultStatus, FaultTransition};
use crate::input::SnapshotReader;
use crate::types::Cycle;

/// Suffix appended to an input's file stem to name its result file.
pub const RESULT_FILE_SUFFIX: &str = "_result.csv";

/// Something worth reporting that happened on one data row.
///
/// Rows are 1-based and count data rows only; the header is not a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Transition {
        row: usize,
        transition: FaultTransition,
    },
    /// The permanent lockout engaged while diagnosing this row.
    Locked { row: usize, cycle: Cycle },
}

impl SessionEvent {
    pub fn row(&self) -> usize {
        match self {
            SessionEvent::Transition { row, .. } | SessionEvent::Locked { row, .. } => *row,
        }
    }
}

/// Outcome of diagnosing one telemetry file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub rows: usize,
    /// Transitions and the lockout, in the order they happened.
    pub events: Vec<SessionEvent>,
    /// Codes still in CONFIRM after the last row.
    pub confirmed: Vec<FaultCode>,
    pub locked: bool,
}

impl SessionReport {
    pub fn transitions(&self) -> impl Iterator<Item = &FaultTransition> + '_ {
        self.events.iter().filter_map(|event| match event {
            SessionEvent::Transition { transition, .. } => Some(transition),
            SessionEvent::Locked { .. } => None,
        })
    }

    /// Number of transitions that ended in `status`.
    pub fn transitions_to(&self, status: FaultStatus) -> usize {
        self.transitions().filter(|t| t.to == status).count()
    }

    /// Row and cycle on which the lockout engaged, if it did.
    pub fn lockout(&self) -> Option<(usize, Cycle)> {
        self.events.iter().find_map(|event| match *event {
            SessionEvent::Locked { row, cycle } => Some((row, cycle)),
            SessionEvent::Transition { .. } => None,
        })
    }

    /// True when no fault ever left NORMAL during the session.
    pub fn is_fault_free(&self) -> bool {
        self.transitions_to(FaultStatus::Detect) == 0
            && self.transitions_to(FaultStatus::Confirm) == 0
    }
}

/// Diagnoses one telemetry document in a fresh session.
///
/// Calls [`DiagnosisEngine::init`] first, so statuses, counters and the
/// lockout of a previous file never leak into this one. Rows after the
/// lockout are still written to `output`, frozen at the locked statuses.
///
/// # Errors
/// - [`ObcError::Parse`] - A telemetry row is malformed
/// - [`ObcError::Io`] - Reading the input or writing the result failed
pub fn run_session<R, W>(
    engine: &mut DiagnosisEngine,
    input: R,
    output: W,
) -> Result<SessionReport, ObcError>
where
    R: BufRead,
    W: Write,
{
    engine.init();
    let mut writer = ResultWriter::new(output);
    let mut report = SessionReport::default();

    for snapshot in SnapshotReader::new(input) {
        let snapshot = snapshot?;
        let was_locked = engine.is_locked();
        engine.diagnose_all(&snapshot);
        writer.write_row(&engine.export_row(snapshot.cycle))?;

        report.rows += 1;
        let row = report.rows;
        report.events.extend(
            engine
                .last_transitions()
                .iter()
                .map(|&transition| SessionEvent::Transition { row, transition }),
        );
        if engine.is_locked() && !was_locked {
            report.events.push(SessionEvent::Locked {
                row,
                cycle: snapshot.cycle,
            });
        }
    }
    writer.finish()?;

    report.confirmed = engine.confirmed_faults();
    report.locked = engine.is_locked();
    info!(
        rows = report.rows,
        transitions = report.transitions().count(),
        locked = report.locked,
        "session complete"
    );
    Ok(report)
}

/// Result file path for `input`: `<stem>_result.csv`, placed in `output_dir`
/// when given and next to the input otherwise.
pub fn result_path_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("telemetry"));
    name.push(RESULT_FILE_SUFFIX);

    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}
