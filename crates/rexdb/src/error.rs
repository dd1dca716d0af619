//! Errors raised while building, rendering or executing statements.
//!
//! Two families matter to callers:
//!
//! - [`DbError::Validation`]: a builder was rejected before any SQL was sent.
//! - everything else: the connection or the server refused the work. Driver
//!   errors arrive as [`DbError::Query`], or as [`DbError::Constraint`] when
//!   the server reports an integrity violation.

use std::fmt;
use thiserror::Error;
use tokio_postgres::error::SqlState;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// Malformed statement: missing table, arity mismatch, placeholder count.
    #[error("invalid statement: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not connect: {0}")]
    Connection(String),

    #[error(transparent)]
    Query(#[from] tokio_postgres::Error),

    /// Integrity constraint reported by the server.
    #[error("{kind} violation on `{constraint}`: {message}")]
    Constraint {
        kind: ConstraintKind,
        constraint: String,
        message: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("expected {expected} row(s), got {got}")]
    TooManyRows { expected: usize, got: usize },

    #[error("cannot decode column `{column}`: {message}")]
    Decode { column: String, message: String },

    #[error("{0}")]
    Other(String),
}

/// Integrity constraint classes distinguished by SQLSTATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Check,
    NotNull,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign key",
            Self::Check => "check",
            Self::NotNull => "not-null",
        })
    }
}

impl DbError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn too_many_rows(expected: usize, got: usize) -> Self {
        Self::TooManyRows { expected, got }
    }

    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The constraint class, when the server rejected a write on integrity grounds.
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            Self::Constraint { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.constraint_kind() == Some(ConstraintKind::Unique)
    }

    /// Classify a driver error, lifting integrity violations into
    /// [`DbError::Constraint`]. Anything else stays a [`DbError::Query`].
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        let Some(db_err) = err.as_db_error() else {
            return Self::Query(err);
        };

        let code = db_err.code();
        let kind = if *code == SqlState::UNIQUE_VIOLATION {
            ConstraintKind::Unique
        } else if *code == SqlState::FOREIGN_KEY_VIOLATION {
            ConstraintKind::ForeignKey
        } else if *code == SqlState::CHECK_VIOLATION {
            ConstraintKind::Check
        } else if *code == SqlState::NOT_NULL_VIOLATION {
            ConstraintKind::NotNull
        } else {
            return Self::Query(err);
        };

        Self::Constraint {
            kind,
            constraint: db_err
                .constraint()
                .or(db_err.column())
                .unwrap_or("unknown")
                .to_string(),
            message: db_err.message().to_string(),
        }
    }
}
