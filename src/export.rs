//! Result CSV export.
//!
//! One row per diagnosed cycle: the cycle number followed by the status of
//! every fault code encoded as NORMAL=0, DETECT=1, CONFIRM=2.

use std::fmt;
use std::io::Write;

use crate::engine::DiagnosisEngine;
use crate::error::ObcError;
use crate::fault::{FAULT_CODE_COUNT, FaultCode, FaultStatus};
use crate::types::Cycle;

/// Header line of the result CSV.
pub const RESULT_HEADER: &str =
    "Cycle,F_0x01,F_0x02,F_0x03,F_0x04,F_0x05,F_0x06,F_0x07,F_0x08,F_0x09,F_0x0A,F_0x0B,F_0x0C";

/// Status table of one cycle, as written to the result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRow {
    pub cycle: Cycle,
    pub statuses: [FaultStatus; FAULT_CODE_COUNT],
}

impl ResultRow {
    /// Captures the engine's current status table under `cycle`.
    pub fn from_engine(cycle: Cycle, engine: &DiagnosisEngine) -> Self {
        Self {
            cycle,
            statuses: engine.status_table(),
        }
    }

    #[inline]
    pub fn status(&self, code: FaultCode) -> FaultStatus {
        self.statuses[code.index()]
    }
}

impl fmt::Display for ResultRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cycle.value())?;
        for status in &self.statuses {
            write!(f, ",{}", status.as_u8())?;
        }
        Ok(())
    }
}

/// Writes result rows as CSV, emitting the header before the first row.
#[derive(Debug)]
pub struct ResultWriter<W: Write> {
    writer: W,
    header_written: bool,
    rows_written: usize,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
            rows_written: 0,
        }
    }

    fn ensure_header(&mut self) -> Result<(), ObcError> {
        if !self.header_written {
            writeln!(self.writer, "{RESULT_HEADER}")?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Appends one row.
    ///
    /// # Errors
    /// - [`ObcError::Io`] - The underlying writer failed
    pub fn write_row(&mut self, row: &ResultRow) -> Result<(), ObcError> {
        self.ensure_header()?;
        writeln!(self.writer, "{row}")?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flushes and returns the underlying writer. An empty result still
    /// receives its header line.
    pub fn finish(mut self) -> Result<W, ObcError> {
        self.ensure_header()?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}
