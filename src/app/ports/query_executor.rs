use async_trait::async_trait;

use askql_domain::QueryResult;

use crate::connection_error::{ConnectionErrorInfo, ConnectionErrorKind};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, dsn: &str, sql: &str) -> Result<QueryResult, ExecutionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("{}", .0.summary())]
    ConnectionFailed(ConnectionErrorInfo),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Query timed out")]
    Timeout,
}

impl ExecutionError {
    /// Sorts psql stderr into a connection problem, a timeout or a statement
    /// error. Only the masked text is kept.
    pub fn from_stderr(stderr: &str) -> Self {
        let info = ConnectionErrorInfo::new(stderr);
        match info.kind {
            ConnectionErrorKind::Timeout => Self::Timeout,
            // Table-level "permission denied" is the statement's problem.
            ConnectionErrorKind::Unknown | ConnectionErrorKind::PermissionDenied => {
                Self::QueryFailed(info.masked_details.trim().to_string())
            }
            _ => Self::ConnectionFailed(info),
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(info) => info.summary(),
            Self::QueryFailed(_) => "Query failed",
            Self::Timeout => "Query timed out",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(info) => info.hint(),
            Self::QueryFailed(_) => "Fix the query in the editor and press Ctrl+E again",
            Self::Timeout => "Narrow the query or raise [execution].timeout_secs",
        }
    }

    /// Masked server message, when there is one worth showing.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::QueryFailed(details) if !details.is_empty() => Some(details),
            _ => None,
        }
    }
}
