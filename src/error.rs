//! Error types for the slcli command-line client.
//!
//! Every failure a command can produce is a [`CliError`]. The binary is the only
//! place that turns one into a printed message and a process exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Fault raised by the remote API (or by the transport talking to it).
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{fault_code}({status}): {fault_string}")]
pub struct RemoteError {
    /// HTTP status (0 when the request never reached the API)
    pub status: u16,
    /// Machine-readable fault code, e.g. `SoftLayer_Exception_ObjectNotFound`
    pub fault_code: String,
    /// Human-readable fault message
    pub fault_string: String,
}

impl RemoteError {
    pub fn new(
        status: u16,
        fault_code: impl Into<String>,
        fault_string: impl Into<String>,
    ) -> Self {
        Self {
            status,
            fault_code: fault_code.into(),
            fault_string: fault_string.into(),
        }
    }

    /// Failure below the API layer: connection refused, timeout, bad TLS, ...
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(0, "TransportError", message)
    }

    /// The API answered, but with `false` or nothing in place of a result.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(200, "OperationRejected", message)
    }

    pub fn is_invalid_token(&self) -> bool {
        self.fault_string.to_lowercase().contains("invalid api token")
    }
}

/// CLI error taxonomy. The variant decides the exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed or missing arguments, unknown resource or action.
    #[error("{0}")]
    Usage(String),

    /// Identifier matched zero or several objects.
    #[error("{0}")]
    Resolution(String),

    /// Confirmation declined or precondition failed.
    #[error("{0}")]
    Aborted(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A local file named on the command line could not be read or written.
    #[error("{}: {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Interrupted")]
    Interrupted,

    /// Invariant violated inside the client itself (bad table shape, encoder failure).
    #[error("Internal error: {0}")]
    Internal(String),

    /// Help text was requested or implied. Not a failure when `code` is 0.
    #[error("{text}")]
    Help { text: String, code: i32 },
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// The canonical user abort.
    pub fn aborted() -> Self {
        Self::Aborted("Aborted.".to_string())
    }

    pub fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Help { code, .. } => *code,
            CliError::Usage(_)
            | CliError::Resolution(_)
            | CliError::Aborted(_)
            | CliError::LocalIo { .. } => 2,
            CliError::Remote(_) => 3,
            CliError::Config(_) | CliError::Internal(_) => 1,
            CliError::Interrupted => 130,
        }
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        let dialoguer::Error::IO(io) = err;
        if io.kind() == std::io::ErrorKind::Interrupted {
            CliError::Interrupted
        } else {
            CliError::local_io("<stdin>", io)
        }
    }
}
