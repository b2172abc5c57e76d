use std::io;

use memsim_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Standard input reached end-of-file.
    #[error("input stream closed")]
    InputClosed,

    #[error("console I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("telemetry error: {0}")]
    Telemetry(String),
}
