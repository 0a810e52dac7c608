use std::fmt;
use std::process::ExitCode;

use clap::error::ErrorKind as ClapErrorKind;
use docsmith::{DocsmithError, ReviewError};

const EX_OK: u8 = 0;
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_UNAVAILABLE: u8 = 69;
const EX_SOFTWARE: u8 = 70;
const EX_OSERR: u8 = 71;
const EX_CONFIG: u8 = 78;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Ok,
    Usage,
    Data,
    Unavailable,
    Io,
    Config,
    Software,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Ok => EX_OK,
            ExitStatus::Usage => EX_USAGE,
            ExitStatus::Data => EX_DATAERR,
            ExitStatus::Unavailable => EX_UNAVAILABLE,
            ExitStatus::Io => EX_OSERR,
            ExitStatus::Config => EX_CONFIG,
            ExitStatus::Software => EX_SOFTWARE,
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    message: String,
    status: ExitStatus,
}

impl CliError {
    pub fn new(message: impl Into<String>, status: ExitStatus) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message, ExitStatus::Usage)
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status.code())
    }

    pub fn print(&self) {
        if !self.message.is_empty() {
            eprintln!("{}", self.message);
        }
    }
}

fn review_status(err: &ReviewError) -> ExitStatus {
    match err {
        ReviewError::Status { .. } | ReviewError::Transport(_) => ExitStatus::Unavailable,
        ReviewError::NotConfigured => ExitStatus::Config,
        ReviewError::InvalidTransition { .. } => ExitStatus::Data,
        ReviewError::Context { source, .. } => review_status(source),
    }
}

impl From<DocsmithError> for CliError {
    fn from(err: DocsmithError) -> Self {
        let status = match &err {
            DocsmithError::Workspace(_) => ExitStatus::Usage,
            DocsmithError::Config(_) => ExitStatus::Config,
            DocsmithError::Serialization(_) => ExitStatus::Data,
            DocsmithError::Review(review) => review_status(review),
            DocsmithError::Io(_) => ExitStatus::Io,
        };
        CliError::new(err.to_string(), status)
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        let status = match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => ExitStatus::Ok,
            _ => ExitStatus::Usage,
        };
        if status == ExitStatus::Ok {
            let _ = err.print();
            CliError::new(String::new(), status)
        } else {
            CliError::new(err.to_string(), status)
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(err.to_string(), ExitStatus::Io)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_failures_map_to_unavailable() {
        let err = DocsmithError::from(ReviewError::Status {
            code: 502,
            message: "bad gateway".into(),
        })
        .context("submit for review");
        assert_eq!(CliError::from(err).status, ExitStatus::Unavailable);
    }

    #[test]
    fn missing_review_config_maps_to_config() {
        let err = DocsmithError::from(ReviewError::NotConfigured);
        assert_eq!(CliError::from(err).status.code(), 78);
    }
}
