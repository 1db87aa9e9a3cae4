//! The fault diagnosis engine.
//!
//! This module provides the [`DiagnosisEngine`], which owns one detector per
//! fault code, the status table and the permanent lockout flag. It is a
//! decision engine only: it classifies each cycle's snapshot and leaves any
//! action to the control layer that reads the statuses.

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::detectors::build_detectors;
use crate::error::ConfigError;
use crate::export::ResultRow;
use crate::fault::{FAULT_CODE_COUNT, FaultCode, FaultStatus, FaultTransition};
use crate::snapshot::InputSnapshot;
use crate::traits::Detector;
use crate::types::Cycle;

/// Central orchestrator for per-cycle fault diagnosis.
///
/// ## Usage
///
/// 1. Create an engine with [`DiagnosisEngine::new`] (statuses start NORMAL)
/// 2. Call [`diagnose_all`] once per measurement cycle, in cycle order
/// 3. Read results with [`status`], [`is_locked`] or [`last_transitions`]
///
/// The engine is single-threaded and synchronous. Hosts that share one
/// engine between threads must serialise calls per cycle.
///
/// [`diagnose_all`]: Self::diagnose_all
/// [`status`]: Self::status
/// [`is_locked`]: Self::is_locked
/// [`last_transitions`]: Self::last_transitions
#[derive(Debug)]
pub struct DiagnosisEngine {
    config: EngineConfig,
    /// One detector per fault code, in [`FaultCode::ALL`] order.
    detectors: Vec<Box<dyn Detector>>,
    /// Current status per fault code, indexed by [`FaultCode::index`].
    statuses: [FaultStatus; FAULT_CODE_COUNT],
    /// Set once a latching fault reaches its occurrence limit; never cleared by diagnosis.
    system_locked: bool,
    /// Transitions produced by the most recent `diagnose_all` call.
    transitions: Vec<FaultTransition>,
    cycles_diagnosed: u64,
    last_cycle: Option<Cycle>,
}

impl DiagnosisEngine {
    /// Creates an initialised engine for `config`.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidValue`] - A limit is zero or negative
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: EngineConfig) -> Self {
        DiagnosisEngine {
            config,
            detectors: build_detectors(&config),
            statuses: [FaultStatus::Normal; FAULT_CODE_COUNT],
            system_locked: false,
            transitions: Vec::with_capacity(FAULT_CODE_COUNT),
            cycles_diagnosed: 0,
            last_cycle: None,
        }
    }

    /// Resets every status to NORMAL, every detector counter to zero and
    /// clears the lockout flag.
    ///
    /// Starts a new session; the next `diagnose_all` call is treated as the
    /// watchdog baseline again. Calling it repeatedly is idempotent.
    pub fn init(&mut self) {
        for detector in self.detectors.iter_mut() {
            detector.reset();
        }
        self.statuses = [FaultStatus::Normal; FAULT_CODE_COUNT];
        self.system_locked = false;
        self.transitions.clear();
        self.cycles_diagnosed = 0;
        self.last_cycle = None;
    }

    /// Advances every detector by one cycle, in fault-code order.
    ///
    /// Once the system is locked out the call is a no-op: statuses and
    /// counters stay frozen and no transitions are reported.
    pub fn diagnose_all(&mut self, snapshot: &InputSnapshot) {
        self.transitions.clear();

        if self.system_locked {
            debug!(cycle = %snapshot.cycle, "system locked out, diagnosis skipped");
            return;
        }

        for detector in self.detectors.iter_mut() {
            let code = detector.code();
            let previous = self.statuses[code.index()];
            let verdict = detector.diagnose(snapshot, previous);

            if verdict.status != previous {
                let transition = FaultTransition {
                    cycle: snapshot.cycle,
                    code,
                    from: previous,
                    to: verdict.status,
                };
                debug!(
                    cycle = %snapshot.cycle,
                    code = %code,
                    from = %previous,
                    to = %verdict.status,
                    "fault status changed"
                );
                if verdict.status.is_confirmed() {
                    info!(cycle = %snapshot.cycle, code = %code, name = code.name(), "fault confirmed");
                }
                self.transitions.push(transition);
            }
            self.statuses[code.index()] = verdict.status;

            if verdict.lockout && !self.system_locked {
                warn!(
                    cycle = %snapshot.cycle,
                    code = %code,
                    occurrences = self.config.lockout_occurrences,
                    "repeated fault, system locked out"
                );
                self.system_locked = true;
            }
        }

        self.cycles_diagnosed = self.cycles_diagnosed.saturating_add(1);
        self.last_cycle = Some(snapshot.cycle);
    }

    /// Current status of one fault code.
    #[inline]
    pub fn status(&self, code: FaultCode) -> FaultStatus {
        self.statuses[code.index()]
    }

    /// True once a latching fault has locked the system out.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.system_locked
    }

    /// Status of every fault code, in fault-code order.
    pub fn statuses(&self) -> impl Iterator<Item = (FaultCode, FaultStatus)> + '_ {
        FaultCode::ALL
            .iter()
            .map(move |&code| (code, self.statuses[code.index()]))
    }

    /// Status table indexed by [`FaultCode::index`].
    pub fn status_table(&self) -> [FaultStatus; FAULT_CODE_COUNT] {
        self.statuses
    }

    /// Fault codes currently in CONFIRM.
    pub fn confirmed_faults(&self) -> Vec<FaultCode> {
        self.statuses()
            .filter(|(_, status)| status.is_confirmed())
            .map(|(code, _)| code)
            .collect()
    }

    /// Status changes produced by the most recent `diagnose_all` call.
    pub fn last_transitions(&self) -> &[FaultTransition] {
        &self.transitions
    }

    /// Number of cycles actually diagnosed since the last `init`.
    pub fn cycles_diagnosed(&self) -> u64 {
        self.cycles_diagnosed
    }

    /// Cycle number of the most recently diagnosed snapshot.
    pub fn last_cycle(&self) -> Option<Cycle> {
        self.last_cycle
    }

    /// Current status table as a result row labelled with `cycle`.
    pub fn export_row(&self, cycle: Cycle) -> ResultRow {
        ResultRow::from_engine(cycle, self)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for DiagnosisEngine {
    fn default() -> Self {
        Self::with_valid_config(EngineConfig::default())
    }
}
