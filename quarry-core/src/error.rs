use crate::Error;
use std::borrow::Cow;
use thiserror::Error;

/// Broad category of an [`OrmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed annotation or missing column mapping.
    Metadata,
    /// Invalid on-delete keyword, empty table name.
    Schema,
    /// Missing join type, unmapped column, invalid condition or parameter.
    QueryBuild,
    /// Anything raised by the driver, including scan conversions.
    Execution,
    /// Destination does not have the expected shape.
    Shape,
}

/// Errors raised by quarry itself.
///
/// They travel inside [`crate::Error`] (an `anyhow::Error`), use [`error_kind`]
/// or `downcast_ref::<OrmError>()` to inspect them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrmError {
    #[error("[Metadata] invalid annotation `{annotation}`: {reason}")]
    InvalidAnnotation {
        annotation: Cow<'static, str>,
        reason: Cow<'static, str>,
    },
    #[error("[Metadata] {0}")]
    Metadata(Cow<'static, str>),
    #[error("[Schema] invalid constraint on `{table}`.`{column}`: `{action}` is not a valid on delete action")]
    InvalidConstraint {
        table: Cow<'static, str>,
        column: Cow<'static, str>,
        action: Cow<'static, str>,
    },
    #[error("[Schema] the table name is empty")]
    EmptyTableName,
    #[error("[QueryBuild] the join type between `{main}` and `{joined}` was not specified")]
    MissingJoinType {
        main: Cow<'static, str>,
        joined: Cow<'static, str>,
    },
    #[error("[QueryBuild] column `{column}` of `{table}` is not mapped to any field")]
    UnmappedColumn {
        table: Cow<'static, str>,
        column: Cow<'static, str>,
    },
    #[error("[QueryBuild] invalid condition on `{field}`: {reason}")]
    InvalidCondition {
        field: Cow<'static, str>,
        reason: Cow<'static, str>,
    },
    #[error("[QueryBuild] invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: Cow<'static, str>,
        reason: Cow<'static, str>,
    },
    #[error("[QueryBuild] {0}")]
    QueryBuild(Cow<'static, str>),
    #[error("[Execution] {operation} failed")]
    Execution { operation: Cow<'static, str> },
    #[error("[Execution] cannot scan column `{column}` into field `{field}`")]
    Scan {
        column: Cow<'static, str>,
        field: Cow<'static, str>,
    },
    #[error("[Shape] {0}")]
    Shape(Cow<'static, str>),
}

impl OrmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrmError::InvalidAnnotation { .. } | OrmError::Metadata(..) => ErrorKind::Metadata,
            OrmError::InvalidConstraint { .. } | OrmError::EmptyTableName => ErrorKind::Schema,
            OrmError::MissingJoinType { .. }
            | OrmError::UnmappedColumn { .. }
            | OrmError::InvalidCondition { .. }
            | OrmError::InvalidParameter { .. }
            | OrmError::QueryBuild(..) => ErrorKind::QueryBuild,
            OrmError::Execution { .. } | OrmError::Scan { .. } => ErrorKind::Execution,
            OrmError::Shape(..) => ErrorKind::Shape,
        }
    }

    pub(crate) fn execution(operation: &'static str) -> Self {
        OrmError::Execution {
            operation: operation.into(),
        }
    }
}

/// The first quarry error found walking the chain, outermost first.
pub fn orm_error(error: &Error) -> Option<&OrmError> {
    error
        .downcast_ref::<OrmError>()
        .or_else(|| error.chain().find_map(|e| e.downcast_ref::<OrmError>()))
}

/// Category of the outermost quarry error in the chain.
pub fn error_kind(error: &Error) -> Option<ErrorKind> {
    orm_error(error).map(OrmError::kind)
}
