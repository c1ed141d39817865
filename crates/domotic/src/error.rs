//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ServiceError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use domotic_api::{FailureKind, ServiceError};
use domotic_config::ConfigError;
use domotic_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const BUSY: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(domotic::connection_failed),
        help(
            "Check that the API server is running and reachable.\n\
             The base URL in use is shown by: domotic config show"
        )
    )]
    ConnectionFailed { message: String },

    #[error("{message}")]
    #[diagnostic(code(domotic::unavailable), help("The server answered 503. Try again later."))]
    Unavailable { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(domotic::auth_failed),
        help("Log in again with: domotic login")
    )]
    AuthFailed { message: String },

    #[error("Not logged in")]
    #[diagnostic(
        code(domotic::not_logged_in),
        help("Log in with: domotic login --email <EMAIL>")
    )]
    NotLoggedIn,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(domotic::not_found),
        help("Run: domotic {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(domotic::busy),
        help("Wait for the running operation to finish, then retry.")
    )]
    Busy { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(domotic::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(domotic::validation))]
    Validation { field: String, reason: String },

    /// Form input rejected before any request was sent.
    #[error("{message}")]
    #[diagnostic(code(domotic::invalid_input))]
    InvalidInput { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(domotic::profile_not_found),
        help(
            "List profiles with: domotic config profiles\n\
             Create one with: domotic config init"
        )
    )]
    ProfileNotFound { name: String },

    #[error(transparent)]
    #[diagnostic(code(domotic::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(domotic::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Storage / IO / Serialization ─────────────────────────────────
    #[error("Could not save local state to {path}: {message}")]
    #[diagnostic(code(domotic::storage))]
    Storage { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(domotic::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(domotic::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Unavailable { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NotLoggedIn => exit_code::AUTH,
            Self::NotFound { .. } | Self::ApiError { status: Some(404), .. } => {
                exit_code::NOT_FOUND
            }
            Self::Busy { .. } => exit_code::BUSY,
            Self::Validation { .. }
            | Self::InvalidInput { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn prompt(err: impl std::fmt::Display) -> Self {
        Self::Validation {
            field: "interactive".into(),
            reason: format!("prompt failed: {err}"),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound { name },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

// ── ServiceError → CliError mapping ──────────────────────────────────

impl From<ServiceError> for CliError {
    fn from(err: ServiceError) -> Self {
        let message = err.message().to_owned();
        match err.kind() {
            FailureKind::NoResponse => CliError::ConnectionFailed { message },
            FailureKind::Unavailable => CliError::Unavailable { message },
            FailureKind::Server | FailureKind::Other if err.is_unauthorized() => {
                CliError::AuthFailed { message }
            }
            FailureKind::Server | FailureKind::Other => CliError::ApiError {
                message,
                status: err.status(),
            },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => CliError::InvalidInput { message },

            CoreError::Busy { .. } | CoreError::RefreshInProgress => CliError::Busy {
                message: err.to_string(),
            },

            CoreError::WizardStep { .. } => CliError::Validation {
                field: "selection".into(),
                reason: err.to_string(),
            },

            CoreError::UnsupportedCommand { .. } => CliError::Validation {
                field: "command".into(),
                reason: err.to_string(),
            },

            CoreError::NotFound { entity, id } => CliError::NotFound {
                resource_type: entity.into(),
                identifier: id.to_string(),
                list_command: format!("{entity}s list"),
            },

            CoreError::MissingToken => CliError::AuthFailed {
                message: err.to_string(),
            },

            CoreError::Storage { path, message } => CliError::Storage { path, message },

            CoreError::Service(e) => e.into(),
        }
    }
}
