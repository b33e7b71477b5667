use crate::core::{Connector, SqlSession};
use crate::domain::model::{ConnectionTarget, DbCredentials};
use crate::utils::error::{InitError, Result};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection, Executor};

#[derive(Debug, Clone, Default)]
pub struct MySqlConnector;

impl MySqlConnector {
    pub fn new() -> Self {
        Self
    }

    fn connect_options(target: &ConnectionTarget, credentials: &DbCredentials) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&target.host)
            .port(target.port)
            .username(&credentials.username)
            .password(&credentials.password)
            .database(&target.database)
            // user.sql 內含密碼，不可寫入日誌
            .disable_statement_logging()
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    type Session = MySqlSession;

    async fn connect(
        &self,
        target: &ConnectionTarget,
        credentials: &DbCredentials,
    ) -> Result<MySqlSession> {
        let mut conn = Self::connect_options(target, credentials).connect().await?;

        // 所有語句在同一個交易中，最後統一 COMMIT
        conn.execute(sqlx::raw_sql("SET autocommit = 0")).await?;

        tracing::info!("🔌 Connected to {}", target);
        Ok(MySqlSession { conn: Some(conn) })
    }
}

/// A single MySQL connection with autocommit disabled.
///
/// Statements go through the text protocol so that account management
/// statements are accepted. Closing without `commit` rolls back whatever
/// the server has not implicitly committed.
pub struct MySqlSession {
    conn: Option<MySqlConnection>,
}

impl MySqlSession {
    fn connection(&mut self) -> Result<&mut MySqlConnection> {
        self.conn.as_mut().ok_or_else(|| {
            InitError::DatabaseError(sqlx::Error::Protocol(
                "database connection already closed".to_string(),
            ))
        })
    }
}

#[async_trait]
impl SqlSession for MySqlSession {
    async fn ping(&mut self) -> Result<i64> {
        let conn = self.connection()?;
        let value = sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(conn).await?;
        Ok(value)
    }

    async fn execute(&mut self, statement: &str) -> Result<u64> {
        let conn = self.connection()?;
        let result = conn.execute(sqlx::raw_sql(statement)).await?;
        Ok(result.rows_affected())
    }

    async fn commit(&mut self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(sqlx::raw_sql("COMMIT")).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().await?;
            tracing::debug!("Database connection closed");
        }
        Ok(())
    }
}
