//! Logging setup for pipeline binaries.
//!
//! The library crates only emit through the `log` facade. A binary picks one
//! of two sinks at startup:
//!
//! - [`init_with_level`] / [`init_from_env`]: plain stderr lines such as
//!   `[  0.012s DEBUG filters] area: 5 -> 3`;
//! - `init_tracing` (feature `tracing`): a `tracing-subscriber` formatter with
//!   span timings, optionally as JSON.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable read by [`init_from_env`].
pub const LOG_ENV_VAR: &str = "VISION_PIPELINE_LOG";

const CRATE_PREFIX: &str = "vision_pipeline_";

static INSTALLED: AtomicBool = AtomicBool::new(false);

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// `vision_pipeline_filters::area` -> `filters`; foreign targets keep their
/// crate name.
fn short_target(target: &str) -> &str {
    let krate = target.split("::").next().unwrap_or(target);
    krate.strip_prefix(CRATE_PREFIX).unwrap_or(krate)
}

fn format_line(elapsed: f64, level: Level, target: &str, message: &str) -> String {
    format!(
        "[{elapsed:7.3}s {level:>5} {}] {message}",
        short_target(target)
    )
}

/// Install the stderr logger.
///
/// The first call wins: later calls leave the installed level alone and
/// return `Ok`. Fails if some other `log` backend is already set.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if INSTALLED.swap(true, Ordering::AcqRel) {
        return Ok(());
    }
    let logger = StderrLogger {
        level,
        started: Instant::now(),
    };
    if let Err(err) = log::set_boxed_logger(Box::new(logger)) {
        INSTALLED.store(false, Ordering::Release);
        return Err(err);
    }
    log::set_max_level(level);
    Ok(())
}

/// Level names as `log` spells them, any case, surrounding blanks ignored.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse().ok()
}

/// Like [`init_with_level`], with the level taken from [`LOG_ENV_VAR`].
/// An unset or unknown value means `default`.
pub fn init_from_env(default: LevelFilter) -> Result<(), log::SetLoggerError> {
    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(default);
    init_with_level(level)
}

/// Route everything through `tracing-subscriber`, filtered by `RUST_LOG`
/// (`info` when unset). Does nothing if a global subscriber already exists.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let base = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);
    let installed = if json {
        base.json().flatten_event(true).finish().try_init()
    } else {
        base.with_timer(fmt::time::Uptime::default())
            .compact()
            .finish()
            .try_init()
    };
    if installed.is_err() {
        log::debug!("tracing subscriber already installed");
    }
}
