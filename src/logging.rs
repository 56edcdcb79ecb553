use anyhow::Context;
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Stderr verbosity. Store and loader progress is logged at info, so the
/// default keeps the terminal down to warnings.
pub fn filter_directive(debug: bool, quiet: bool) -> &'static str {
    match (debug, quiet) {
        (true, _) => "skylogix=debug",
        (false, true) => "skylogix=error",
        (false, false) => "skylogix=warn",
    }
}

/// The log file records info and above whatever the terminal shows
fn file_directive(debug: bool) -> &'static str {
    if debug { "skylogix=debug" } else { "skylogix=info" }
}

fn open_append(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

/// Install the global subscriber: plain lines on stderr, plus JSON lines
/// appended to `log_file` when given
pub fn init_logging(debug: bool, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_line_number(debug)
        .with_file(debug)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter_directive(debug, quiet)));

    let file_layer = match log_file {
        Some(path) => {
            let file = open_append(path)?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(false)
                    .with_filter(EnvFilter::new(file_directive(debug))),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
