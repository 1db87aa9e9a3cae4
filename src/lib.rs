//! `obcdiag`: fault diagnosis for on-board EV chargers.
//!
//! This library classifies the per-cycle telemetry of an on-board charger
//! (phase currents, relay and stop flags, battery voltages, temperature, CAN
//! traffic, isolation resistance, plug/payment and sequence state) into twelve
//! fault codes, each with a NORMAL / DETECT / CONFIRM status. The primary entry
//! point is the [`DiagnosisEngine`].
//!
//! ## Core Concepts
//!
//! - **[`DiagnosisEngine`]**: Owns the status table and the lockout flag and
//!   runs every detector once per cycle, in fault-code order.
//! - **Detectors**: One [`Detector`] per [`FaultCode`]. Most share the
//!   debounced state machine in [`debounce`]; payment, watchdog and sequence
//!   timeout have their own.
//! - **Lockout**: Plug power (0x03), over temperature (0x06) and sequence
//!   timeout (0x0B) lock the system permanently once they have entered
//!   CONFIRM three times. Only [`DiagnosisEngine::init`] clears it.
//! - **Sessions**: [`run_session`] diagnoses one telemetry CSV from a freshly
//!   initialised engine and reports its transitions and lockout row.
//!
//! ## Quick Start
//!
//! ```rust
//! use obcdiag::snapshot::{PhaseCurrents, PlugInfo, SequenceState};
//! use obcdiag::{Cycle, DiagnosisEngine, FaultCode, FaultStatus, InputSnapshot};
//!
//! let mut engine = DiagnosisEngine::default();
//!
//! for cycle in 0..10 {
//!     let snapshot = InputSnapshot {
//!         cycle: Cycle::new(cycle),
//!         seq_state: SequenceState::Charging,
//!         plug_info: PlugInfo::ConnectedPaid,
//!         relay_flag: true,
//!         phase_currents: PhaseCurrents::balanced(35.0),
//!         battery_real_voltage: 400,
//!         battery_expected_voltage: 400,
//!         temperature: 30,
//!         can_message_received: true,
//!         isolation_resistance: 800,
//!         ..Default::default()
//!     };
//!     engine.diagnose_all(&snapshot);
//! }
//!
//! assert_eq!(engine.status(FaultCode::InputOvercurrent), FaultStatus::Confirm);
//! assert!(!engine.is_locked());
//! ```

pub mod config;
pub mod constants;
pub mod debounce;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod export;
pub mod fault;
pub mod fuzz_harnesses;
pub mod input;
pub mod session;
pub mod snapshot;
pub mod traits;
pub mod types;

pub use config::{EngineConfig, SequenceTimeoutConfig, WatchdogConfig};
pub use engine::DiagnosisEngine;
pub use error::{ConfigError, ObcError, SnapshotParseError};
pub use export::{ResultRow, ResultWriter};
pub use fault::{FaultCode, FaultStatus, FaultTransition};
pub use input::SnapshotReader;
pub use session::{SessionEvent, SessionReport, run_session};
pub use snapshot::InputSnapshot;
pub use traits::{Detector, Verdict};
pub use types::{ChargeCount, Cycle};
