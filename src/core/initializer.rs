use crate::core::batch::split_statements;
use crate::core::{ConfigProvider, Connector, SecretProvider, SqlSession, SqlSource};
use crate::domain::model::{BatchReport, InitReport};
use crate::utils::error::{InitError, Result};
use crate::utils::timing::PhaseTimer;
use chrono::Utc;
use std::error::Error as _;
use std::time::{Duration, Instant};

pub struct DatabaseInitializer<S, Q, C, P>
where
    S: SecretProvider,
    Q: SqlSource,
    C: Connector,
    P: ConfigProvider,
{
    secrets: S,
    sql_source: Q,
    connector: C,
    config: P,
}

impl<S, Q, C, P> DatabaseInitializer<S, Q, C, P>
where
    S: SecretProvider,
    Q: SqlSource,
    C: Connector,
    P: ConfigProvider,
{
    pub fn new(secrets: S, sql_source: Q, connector: C, config: P) -> Self {
        Self {
            secrets,
            sql_source,
            connector,
            config,
        }
    }

    /// Fetches credentials, connects and runs every configured SQL file.
    ///
    /// The session is closed on every path once it has been opened. Errors
    /// are logged here and returned unchanged to the caller.
    pub async fn run(&self) -> Result<InitReport> {
        let mut timer = PhaseTimer::new();
        tracing::info!("🚀 Starting database initialization");

        let result = self.initialize(&mut timer).await;

        if let Err(e) = &result {
            log_failure(e);
        }

        if let Some(elapsed) = timer.phase_elapsed() {
            timer.log_elapsed("Connection to database and initialization", elapsed);
        }
        timer.log_total();

        result
    }

    async fn initialize(&self, timer: &mut PhaseTimer) -> Result<InitReport> {
        let credentials = self.secrets.fetch_credentials().await?;
        let secret_elapsed = timer.total_elapsed();
        timer.log_elapsed("Secret retrieval", secret_elapsed);

        timer.begin_phase();
        let target = self.config.connection_target();
        tracing::info!("🔌 Connecting to {} as {}", target, credentials.username);
        let mut session = self.connector.connect(target, &credentials).await?;

        let outcome = self.execute_batches(&mut session).await;

        // 不論成功與否都要關閉連線
        if let Err(e) = session.close().await {
            tracing::warn!("⚠️ Failed to close database connection: {}", e);
        }

        let batches = outcome?;
        Ok(InitReport {
            batches,
            secret_elapsed,
            init_elapsed: timer.phase_elapsed().unwrap_or(Duration::ZERO),
            total_elapsed: timer.total_elapsed(),
            completed_at: Utc::now(),
        })
    }

    async fn execute_batches(&self, session: &mut C::Session) -> Result<Vec<BatchReport>> {
        let ping = session.ping().await?;
        tracing::info!("Connection test result: {}", ping);

        let mut reports = Vec::with_capacity(self.config.sql_files().len());
        for name in self.config.sql_files() {
            tracing::info!("📄 Executing SQL file: {}", name);
            let started = Instant::now();

            let batch = self.sql_source.read_batch(name).await?;
            let statements = split_statements(&batch.contents, self.config.delimiter());

            for (i, statement) in statements.iter().enumerate() {
                tracing::debug!("Executing statement {} of {}", i + 1, name);
                session
                    .execute(statement)
                    .await
                    .map_err(|e| match e {
                        InitError::DatabaseError(source) => InitError::StatementError {
                            file: name.clone(),
                            index: i + 1,
                            source,
                        },
                        other => other,
                    })?;
            }

            reports.push(BatchReport {
                name: batch.name,
                statements: statements.len(),
                elapsed: started.elapsed(),
            });
        }

        session.commit().await?;
        tracing::info!("✅ Database initialized successfully");

        Ok(reports)
    }
}

/// Logs an initialization failure with its source chain.
pub fn log_failure(error: &InitError) {
    tracing::error!(
        category = ?error.category(),
        "❌ Error initializing database: {}",
        error
    );

    let mut source = error.source();
    while let Some(cause) = source {
        tracing::error!("  caused by: {}", cause);
        source = cause.source();
    }
    tracing::debug!("{:#?}", error);
}

/// Reads and splits every configured SQL file without touching the database.
pub async fn dry_run<Q, P>(sql_source: &Q, config: &P) -> Result<Vec<BatchReport>>
where
    Q: SqlSource,
    P: ConfigProvider,
{
    let mut reports = Vec::new();

    for name in config.sql_files() {
        let started = Instant::now();
        let batch = sql_source.read_batch(name).await?;
        let statements = split_statements(&batch.contents, config.delimiter());

        for (i, statement) in statements.iter().enumerate() {
            tracing::debug!("[dry-run] {} #{}: {}", name, i + 1, statement);
        }
        tracing::info!("📄 {} contains {} statements", name, statements.len());

        reports.push(BatchReport {
            name: batch.name,
            statements: statements.len(),
            elapsed: started.elapsed(),
        });
    }

    Ok(reports)
}
