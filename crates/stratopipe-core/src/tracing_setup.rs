use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::constants::LOG_FILE_ENV;

pub fn init_tracing() {
    init_tracing_with_service("stratopipe");
}

/// Stderr logging filtered by `RUST_LOG` (default `info`), plus a debug-level
/// file layer when `STRATOPIPE_LOG_FILE` is set. Safe to call more than once.
pub fn init_tracing_with_service(service_name: &str) {
    let file_logging = std::env::var(LOG_FILE_ENV).ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    let registry = tracing_subscriber::registry().with(stderr_layer);

    let file = file_logging.as_deref().and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Failed to open log file {}: {}", path, e);
                None
            }
        }
    });

    let file_enabled = file.is_some();
    let result = match file {
        Some(file) => {
            let file_layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);
            registry.with(file_layer).try_init()
        }
        None => registry.try_init(),
    };

    if result.is_ok() {
        tracing::debug!(service = service_name, "tracing initialized");
        if let Some(path) = file_logging.filter(|_| file_enabled) {
            eprintln!("File logging enabled: {}", path);
        }
    }
}
