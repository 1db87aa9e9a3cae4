//! `obcdiag` command-line front end.
//!
//! Diagnoses one or more telemetry CSVs, each in a fresh session, and writes
//! a `<stem>_result.csv` status table per input. Every file ends with a
//! verdict line. With `--report` the fault transitions, the lockout row and a
//! summary are printed as well.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use obcdiag::session::result_path_for;
use obcdiag::{
    DiagnosisEngine, EngineConfig, FaultStatus, FaultTransition, ObcError, SessionEvent,
    SessionReport, run_session,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "On-board charger fault diagnosis", long_about = None)]
struct CliArgs {
    /// Telemetry CSVs to diagnose, each starting from a reset engine.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for the result CSVs (default: next to each input).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON file overriding the engine limits.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print fault transitions, the lockout row and a summary per file.
    #[arg(short, long)]
    report: bool,
}

fn report_label(transition: &FaultTransition) -> &'static str {
    match transition.to {
        FaultStatus::Detect => "DETECTED",
        FaultStatus::Confirm => "CONFIRMED",
        FaultStatus::Normal => "CLEARED",
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, ObcError> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let config = EngineConfig::from_json_str(&json)?;
            info!(path = %path.display(), "loaded engine configuration");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn print_events(report: &SessionReport) {
    for event in &report.events {
        match event {
            SessionEvent::Transition { row, transition } => println!(
                "  [{:<9}] row {:>6}  cycle {:>6}  {} {:<28} {} -> {}",
                report_label(transition),
                row,
                transition.cycle.value(),
                transition.code,
                transition.code.name(),
                transition.from,
                transition.to
            ),
            SessionEvent::Locked { row, cycle } => println!(
                "  [{:<9}] row {:>6}  cycle {:>6}  system permanent lock",
                "LOCKED",
                row,
                cycle.value()
            ),
        }
    }
}

fn print_summary(report: &SessionReport) {
    println!("  Rows processed   : {}", report.rows);
    println!(
        "  Transitions      : {} detected, {} confirmed, {} cleared",
        report.transitions_to(FaultStatus::Detect),
        report.transitions_to(FaultStatus::Confirm),
        report.transitions_to(FaultStatus::Normal)
    );
    let confirmed: Vec<String> = report
        .confirmed
        .iter()
        .map(|code| format!("{code} ({})", code.name()))
        .collect();
    if confirmed.is_empty() {
        println!("  Confirmed faults : none");
    } else {
        println!("  Confirmed faults : {}", confirmed.join(", "));
    }
    println!(
        "  System lockout   : {}",
        if report.locked { "ACTIVE" } else { "inactive" }
    );
}

fn print_verdict(report: &SessionReport) {
    if report.is_fault_free() {
        println!("  [RESULT   ] no faults detected");
    } else if let Some((row, cycle)) = report.lockout() {
        println!(
            "  [RESULT   ] faults detected, locked at row {row} (cycle {})",
            cycle.value()
        );
    } else {
        println!("  [RESULT   ] faults detected");
    }
}

fn diagnose_file(
    engine: &mut DiagnosisEngine,
    input: &Path,
    result: &Path,
) -> Result<SessionReport, ObcError> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(result)?);
    run_session(engine, reader, writer)
}

/// Returns the number of inputs that could not be diagnosed.
fn run(args: &CliArgs) -> Result<usize, ObcError> {
    let config = load_config(args.config.as_deref())?;
    let mut engine = DiagnosisEngine::new(config)?;
    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut failures = 0;
    for input in &args.inputs {
        let result = result_path_for(input, args.output_dir.as_deref());
        println!(">>> {}", input.display());

        match diagnose_file(&mut engine, input, &result) {
            Ok(report) => {
                info!(input = %input.display(), result = %result.display(), "diagnosis complete");
                if args.report {
                    print_events(&report);
                    print_summary(&report);
                }
                print_verdict(&report);
            }
            Err(e) => {
                error!(input = %input.display(), "{e}");
                println!("  [ERROR    ] {e}");
                failures += 1;
            }
        }
    }
    Ok(failures)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
