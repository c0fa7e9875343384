//! nolly - Main entry point
//!
//! Knowledge capture interviews and knowledge requests in the terminal.

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use nolly::app::{App, AppState};
use nolly::cli::{Cli, Commands};
use nolly::engine::WizardSession;
use nolly::error::NollyError;
use nolly::flow::FlowDefinition;
use nolly::flows::{capture, request};
use nolly::submission::{JsonFileSink, MemorySink, Submission, SubmissionSink};

/// Initialize tracing.
///
/// While a wizard owns the terminal, logs only go to `--log-file`; other
/// commands log to stderr. `RUST_LOG` overrides the default `info` level.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.log_file.as_deref(), cli.is_interactive())?;
    info!("nolly starting up");

    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Validate { flow }) => validate_flow(&flow),
        Some(Commands::ExportFlow { flow, path }) => {
            flow.definition().save_to_file(&path)?;
            info!(path = %path.display(), "Flow exported");
            println!("✓ Wrote {} flow to {}", flow.definition().id, path.display());
            Ok(())
        }
        Some(Commands::Request { output }) => {
            let state = AppState::request(request::request_wizard()?, today);
            run_wizard(state, output)
        }
        Some(Commands::Capture { flow, output }) => {
            let definition = match flow {
                Some(path) => FlowDefinition::load_from_file(&path)?,
                None => capture::capture_flow(),
            };
            let state = AppState::capture(WizardSession::new(definition)?, today);
            run_wizard(state, output)
        }
        None => {
            let state = AppState::capture(capture::capture_wizard()?, today);
            run_wizard(state, None)
        }
    }
}

fn validate_flow(path: &Path) -> Result<()> {
    info!(path = %path.display(), "Validating flow file");
    let flow = FlowDefinition::load_from_file(path)?;
    match flow.validate() {
        Ok(()) => {
            println!(
                "✓ Flow '{}' is valid: {} sections, {} steps",
                flow.id,
                flow.sections.len(),
                flow.steps.len()
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Flow validation failed");
            Err(e).context(format!("Invalid flow in {}", path.display()))
        }
    }
}

/// Run a wizard in the alternate screen, then report the submission
fn run_wizard(state: AppState, output: Option<PathBuf>) -> Result<()> {
    let sink: Box<dyn SubmissionSink> = match &output {
        Some(path) => Box::new(JsonFileSink::new(path)),
        None => Box::new(MemorySink::default()),
    };
    let mut app = App::new(state, sink);

    let submission = run_tui(&mut app)?;

    match (submission, output) {
        (Some(submission), Some(path)) => {
            println!("✓ Submission saved to {}", path.display());
            debug!(flow = %submission.flow_id, "Run finished");
        }
        (Some(submission), None) => print_submission(&submission)?,
        (None, _) => info!("Exited without submitting"),
    }
    Ok(())
}

fn run_tui(app: &mut App) -> Result<Option<Submission>> {
    debug!("Initializing terminal for TUI mode");

    enable_raw_mode()
        .map_err(|e| NollyError::terminal(format!("Failed to enable raw mode: {}", e)))?;

    let result = restore_after(
        || {
            crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen).map_err(
                |e| NollyError::terminal(format!("Failed to enter alternate screen: {}", e)),
            )?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))
                .map_err(|e| NollyError::terminal(format!("Failed to create terminal: {}", e)))?;
            app.run(&mut terminal)
                .map_err(|e| NollyError::terminal(e.to_string()))
        },
        || {
            let _ = disable_raw_mode();
            let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);
        },
    );

    Ok(result?)
}

/// Run `body` with raw mode on, then `restore`, whichever way `body` exits
fn restore_after<T>(
    body: impl FnOnce() -> nolly::error::Result<T>,
    restore: impl FnOnce(),
) -> nolly::error::Result<T> {
    let result = body();
    restore();
    result
}

fn print_submission(submission: &Submission) -> Result<()> {
    let json = serde_json::to_string_pretty(submission)
        .context("Failed to serialize submission to JSON")?;
    println!("{}", json);
    Ok(())
}
