use crate::balancing::ExportRequest;
use crate::cgmes::ModelReport;
use crate::config::Config;
use log::{debug, info, warn};
use std::path::Path;

/// Level for the given flags; quiet wins over verbose
pub fn log_level(verbose: bool, quiet: bool) -> log::LevelFilter {
    if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    }
}

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = log_level(verbose, quiet);

    // try_init: tests and embedding callers may already have installed a logger
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .try_init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log configuration information
pub fn log_config_info(config: &Config) {
    let timeout = config.timeout.unwrap_or_default();
    let retry_attempts = config.retry_attempts.unwrap_or(0);
    let retry_delay = config.retry_delay.unwrap_or_default();
    let api_url = config.api_url.as_deref().unwrap_or("-");
    let timezone = config.timezone.as_deref().unwrap_or("-");
    let resample = config.resample_minutes();

    info!("Configuration: timeout={timeout}s, api_url={api_url}, timezone={timezone}");
    info!("Retry: attempts={retry_attempts}, delay={retry_delay}ms");
    info!("Resample: {resample} min");
    if let Some(ref proxy) = config.proxy {
        debug!("Proxy: {proxy}");
    }
}

pub fn log_fetch(request: &ExportRequest) {
    info!(
        "GET {} [{} .. {}] tz={}",
        request.item_id, request.start, request.end, request.timezone
    );
}

pub fn log_fetch_complete(dataset: &str, bytes: usize) {
    debug!("{dataset}: received {bytes} bytes");
}

pub fn log_retry(dataset: &str, attempt: u8, err: &reqwest::Error) {
    warn!("{dataset}: request failed ({err}), retry {attempt}");
}

pub fn log_frame(dataset: &str, rows: usize, columns: usize) {
    debug!("{dataset}: {rows} rows x {columns} columns");
}

pub fn log_chart(path: &Path) {
    info!("Chart written to {}", path.display());
}

/// Log a summary of the CGMES scans
pub fn log_scan(report: &ModelReport) {
    info!(
        "Scanned model: {} generating units, {} winding blocks, {} PATL / {} TATL limits",
        report.generators.len(),
        report.winding_definitions,
        report.limits.patl_values.len(),
        report.limits.tatl_values.len()
    );
    if report.issues.is_empty() {
        debug!("No model issues detected");
    } else {
        warn!("{} model issue(s) detected", report.issues.len());
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}
