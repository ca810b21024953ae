//! CLI errors and their exit codes

use murkl_circuit::InputError;
use murkl_groth16::Groth16Error;
use thiserror::Error;

/// Exit code for usage and validation failures (and a rejected proof)
pub const EXIT_INVALID: u8 = 1;

/// Exit code for unknown commands and proving failures
pub const EXIT_FAILURE: u8 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Groth16(#[from] Groth16Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) | Self::Input(_) | Self::Io(_) => EXIT_INVALID,
            Self::Groth16(e) if e.is_invalid_input() => EXIT_INVALID,
            Self::Groth16(_) => EXIT_FAILURE,
        }
    }
}
