// SPDX-License-Identifier: MPL-2.0
//! Errors surfaced by configuration loading and manager construction.
//!
//! Store transitions never fail; unknown ids are no-ops or upserts.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),
    #[error("Config Error: {0}")]
    Config(String),
    /// The manager needs a tokio runtime to drive its timers.
    #[error("Runtime Error: no tokio runtime is running on this thread")]
    NoRuntime,
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io(source.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::Config(source.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::Config(source.to_string())
    }
}

impl From<tokio::runtime::TryCurrentError> for Error {
    fn from(_: tokio::runtime::TryCurrentError) -> Self {
        Error::NoRuntime
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_carry_the_parser_message() {
        let parse_error = toml::from_str::<toml::Table>("limit = [").unwrap_err();
        let err: Error = parse_error.into();
        assert!(matches!(&err, Error::Config(detail) if !detail.is_empty()));
        assert!(err.to_string().starts_with("Config Error: "));
    }

    #[test]
    fn io_errors_keep_their_description() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "toasts.toml").into();
        assert_eq!(err.to_string(), "I/O Error: toasts.toml");
    }

    #[test]
    fn missing_runtime_is_reported() {
        let err: Error = tokio::runtime::Handle::try_current().unwrap_err().into();
        assert!(matches!(err, Error::NoRuntime));
        assert!(err.to_string().contains("tokio runtime"));
    }
}
