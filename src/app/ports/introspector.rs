use async_trait::async_trait;

use askql_domain::IntrospectionRows;

use crate::connection_error::ConnectionErrorInfo;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemaIntrospector: Send + Sync {
    async fn fetch_schema(&self, dsn: &str) -> Result<IntrospectionRows, IntrospectionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntrospectionError {
    #[error("{}", .0.summary())]
    ConnectionFailed(ConnectionErrorInfo),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Operation timed out")]
    Timeout,
}
