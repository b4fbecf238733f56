//! Error type definitions.
//!
//! This module defines the error taxonomy used throughout the application and
//! the outcome categories counted during a sentry run.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Errors raised by the catalog store.
///
/// "Not found" is never a `StoreError`: lookups return `Ok(None)` for a miss.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Migration failure.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A write targeted a mirror that does not exist.
    #[error("Unknown mirror id {0}")]
    UnknownMirror(i64),
}

/// Errors that end a sentry run before any mirror is probed.
///
/// Failures of individual mirrors or locations never surface here; they are
/// logged and counted in the run's report instead.
#[derive(Error, Debug)]
pub enum SentryError {
    /// Another sweep holds the run lock.
    #[error("A sentry run is already in progress")]
    AlreadyRunning,

    /// Loading the run's mirrors or locations failed.
    #[error("Failed to load sweep inputs: {0}")]
    Store(#[from] StoreError),
}

/// A failed health probe.
///
/// Probe errors are converted into an unhealthy classification and never
/// propagated out of a sweep.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The request did not produce a response.
    #[error("{kind}: {source}")]
    Transport {
        /// Category of the transport failure.
        kind: ErrorType,
        /// Underlying client error.
        #[source]
        source: ReqwestError,
    },

    /// The server answered with a status that marks it unhealthy.
    #[error("Bad Response: {0}")]
    BadStatus(reqwest::StatusCode),
}

/// Errors from the HTTP front end.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Categories of transport failures seen while probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    HttpRequestBuilderError,
    HttpRequestRedirectError,
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    HttpRequestRequestError,
    HttpRequestBodyError,
    HttpRequestOtherError,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestRequestError => "HTTP request error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
        }
    }
}

/// Outcomes counted once per probe during a sentry run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum OutcomeType {
    /// Mirror root answered below 500.
    MirrorUp,
    /// Mirror root failed or answered 5xx.
    MirrorDown,
    /// 200 with a non-HTML body.
    LocationHealthy,
    /// 403 or 404: the file is not published there.
    LocationPruned,
    /// Any other status, or a transport failure.
    LocationDegraded,
    /// A store write for this unit failed.
    WriteFailure,
    /// A mirror or location task panicked.
    TaskPanicked,
}

impl OutcomeType {
    /// Returns a human-readable string representation of the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeType::MirrorUp => "Mirror up",
            OutcomeType::MirrorDown => "Mirror down",
            OutcomeType::LocationHealthy => "Location healthy",
            OutcomeType::LocationPruned => "Location pruned (403/404)",
            OutcomeType::LocationDegraded => "Location degraded",
            OutcomeType::WriteFailure => "Store write failure",
            OutcomeType::TaskPanicked => "Task panicked",
        }
    }
}
