//! Error types shared by the calculator, the collection manager and the front-ends.

use std::fmt;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error returned by collection operations and commands.
#[derive(Debug, Error)]
pub enum Error {
    /// A draft failed local validation. No request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The remote store could not be reached or rejected the request.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The runtime configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal or prompt I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fields of a task draft, used to attach validation errors to a form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    EmployeeName,
    TaskDescription,
    Date,
    HoursSpent,
    HourlyRate,
    AdditionalCharges,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Field; 6] = [
        Field::EmployeeName,
        Field::TaskDescription,
        Field::Date,
        Field::HoursSpent,
        Field::HourlyRate,
        Field::AdditionalCharges,
    ];

    /// Wire name of the field, as it appears in the JSON body.
    pub fn name(&self) -> &'static str {
        match self {
            Field::EmployeeName => "employee_name",
            Field::TaskDescription => "task_description",
            Field::Date => "date",
            Field::HoursSpent => "hours_spent",
            Field::HourlyRate => "hourly_rate",
            Field::AdditionalCharges => "additional_charges",
        }
    }

    /// Human readable label for tables and forms.
    pub fn label(&self) -> &'static str {
        match self {
            Field::EmployeeName => "Employee Name",
            Field::TaskDescription => "Task Description",
            Field::Date => "Date",
            Field::HoursSpent => "Hours Spent",
            Field::HourlyRate => "Hourly Rate",
            Field::AdditionalCharges => "Additional Charges",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Failure talking to the remote store.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The store has no task with this id.
    #[error("task {id} not found")]
    NotFound { id: u64 },

    /// The store answered with a non-2xx status.
    #[error("remote store returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never completed (connection refused, timeout, ...).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not the expected JSON shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TransportError {
    /// HTTP status attached to the failure, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::NotFound { .. } => Some(404),
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request(e) => e.status().map(|s| s.as_u16()),
            TransportError::Decode(_) => None,
        }
    }
}

/// Invalid runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
