use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use crate::allocation::RequestContext;
use crate::config::Settings;

/// Install a stderr logger at `settings.log_level`. An unparseable level
/// falls back to `warn`. Calling this twice is harmless.
pub fn init(settings: &Settings) {
    let level = settings
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Warn);
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Never);
}

/// Expanded audit log path, or `None` if `~` cannot be resolved.
pub fn audit_path(settings: &Settings) -> Option<PathBuf> {
    shellexpand::full(&settings.audit_log)
        .ok()
        .map(|p| PathBuf::from(p.as_ref()))
}

/// Append one allocation record to the audit log.
/// Best-effort: failures only produce a `warn!`, never an error.
pub fn log_allocation(
    settings: &Settings,
    ctx: &RequestContext,
    strategy: &str,
    outcome: &str,
    detail: &str,
) {
    let Some(path) = audit_path(settings) else {
        log::warn!("audit log path {:?} could not be expanded", settings.audit_log);
        return;
    };
    if let Err(e) = append_line(&path, ctx, strategy, outcome, detail) {
        log::warn!("failed to write audit log {}: {e}", path.display());
    }
}

fn append_line(
    path: &Path,
    ctx: &RequestContext,
    strategy: &str,
    outcome: &str,
    detail: &str,
) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    // One record per line.
    let detail = detail.replace(['\n', '\t'], " ");
    let ts = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    writeln!(
        file,
        "{ts}\t{requester}\t{role}\t{strategy}\t{outcome}\t{detail}",
        requester = ctx.requester,
        role = ctx.role,
    )
}
