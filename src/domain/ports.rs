use crate::domain::model::{ConnectionTarget, DbCredentials, SqlBatch};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait SecretProvider: Send + Sync {
    fn fetch_credentials(
        &self,
    ) -> impl std::future::Future<Output = Result<DbCredentials>> + Send;
}

pub trait SqlSource: Send + Sync {
    fn read_batch(&self, name: &str)
        -> impl std::future::Future<Output = Result<SqlBatch>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn connection_target(&self) -> &ConnectionTarget;
    fn sql_files(&self) -> &[String];
    fn delimiter(&self) -> char;
}

/// One open database connection.
#[async_trait]
pub trait SqlSession: Send {
    /// Runs `SELECT 1` and returns the scalar.
    async fn ping(&mut self) -> Result<i64>;
    /// Executes a single statement, returning the affected row count.
    async fn execute(&mut self, statement: &str) -> Result<u64>;
    async fn commit(&mut self) -> Result<()>;
    /// Idempotent; a second call is a no-op.
    async fn close(&mut self) -> Result<()>;
}

#[async_trait]
pub trait Connector: Send + Sync {
    type Session: SqlSession;

    async fn connect(
        &self,
        target: &ConnectionTarget,
        credentials: &DbCredentials,
    ) -> Result<Self::Session>;
}
