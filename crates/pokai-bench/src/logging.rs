use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{Level, event};
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingConfig, ResolvedOutputs};

const TELEMETRY_FILE: &str = "telemetry.jsonl";

/// Crates whose events reach the telemetry file at the configured level.
const TRACED_CRATES: [&str; 3] = ["pokai_core", "pokai_bot", "pokai_bench"];

/// Keeps the background writer alive; dropping it flushes the telemetry file.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Routes selector, estimator and game events to `telemetry.jsonl` beside the
/// game log. `RUST_LOG` overrides the configured level.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
    run_id: &str,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let telemetry_path = telemetry_path(&outputs.jsonl);
    let file = create_telemetry_file(&telemetry_path)?;
    let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(file);

    let level = logging.level().unwrap_or(Level::INFO);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)));

    let installed = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_target(true)
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init()
        .is_ok();

    event!(
        target: "pokai_bench::game",
        Level::INFO,
        run_id,
        installed,
        telemetry = %telemetry_path.display(),
        "telemetry started"
    );

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}

/// Telemetry file written beside the game log.
pub fn telemetry_path(game_log: &Path) -> PathBuf {
    game_log
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join(TELEMETRY_FILE)
}

fn create_telemetry_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating telemetry directory at {}", dir.display()))?;
    }
    File::create(path).with_context(|| format!("creating telemetry file at {}", path.display()))
}

/// Everything else stays at `warn` so dependency chatter does not drown the
/// game events.
fn directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    TRACED_CRATES
        .iter()
        .fold(String::from("warn"), |mut out, target| {
            out.push_str(&format!(",{target}={level}"));
            out
        })
}
