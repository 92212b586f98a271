use std::{fs::OpenOptions, io, path::Path, sync::Mutex};

use configs::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter for a configured level; `RUST_LOG` still takes precedence.
pub fn env_filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize tracing from the `[logging]` config section.
///
/// With `filename` set, events are appended to that file instead of stdout.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let filter = env_filter_for(&cfg.level);
    match &cfg.filename {
        Some(filename) => {
            if let Some(parent) = Path::new(filename).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(filename)?;
            let writer = Mutex::new(file);
            let builder = fmt().with_env_filter(filter).with_target(false).with_ansi(false);
            let _ = match cfg.format {
                LogFormat::Compact => builder.compact().with_writer(writer).try_init(),
                LogFormat::Json => builder.json().with_writer(writer).try_init(),
            };
        }
        None => {
            let builder = fmt().with_env_filter(filter).with_target(false);
            let _ = match cfg.format {
                LogFormat::Compact => builder.compact().with_writer(io::stdout).try_init(),
                LogFormat::Json => builder.json().with_writer(io::stdout).try_init(),
            };
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logging_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("taskboard_logs_{}", uuid::Uuid::new_v4()));
        let file = dir.join("nested").join("app.log");
        let cfg = LoggingConfig {
            level: "debug".into(),
            format: LogFormat::Json,
            filename: Some(file.to_string_lossy().into_owned()),
        };
        init_logging(&cfg).unwrap();
        assert!(file.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
