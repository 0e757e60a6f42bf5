use searchgate_shared::{ErrorCode, ErrorEnvelope};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    #[allow(dead_code)]
    Ok = 0,
    InvalidInput = 2,
    Io = 3,
    Internal = 1,
}

impl ExitCode {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug)]
pub enum CliError {
    #[allow(dead_code)]
    InvalidInput(String),
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Search(ErrorEnvelope),
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidInput(_) => ExitCode::InvalidInput,
            Self::Io(_) => ExitCode::Io,
            Self::Serialization(_) => ExitCode::Internal,
            Self::Search(envelope) => {
                if envelope.code == ErrorCode::invalid_input()
                    || envelope.code == ErrorCode::failed_precondition()
                {
                    ExitCode::InvalidInput
                } else if envelope.code == ErrorCode::dependency_unavailable()
                    || envelope.code == ErrorCode::timeout()
                {
                    ExitCode::Io
                } else {
                    ExitCode::Internal
                }
            },
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(formatter, "invalid input: {message}"),
            Self::Io(error) => write!(formatter, "io error: {error}"),
            Self::Serialization(error) => write!(formatter, "serialization error: {error}"),
            Self::Search(envelope) => write!(formatter, "search failed: {envelope}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error)
    }
}

impl From<ErrorEnvelope> for CliError {
    fn from(envelope: ErrorEnvelope) -> Self {
        Self::Search(envelope)
    }
}
