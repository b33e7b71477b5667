use crate::config::{parse_delimiter, parse_file_list, InitConfig};
use crate::core::initializer::log_failure;
use crate::core::{ConfigProvider, SecretProvider};
use crate::domain::model::{ConnectionTarget, DbCredentials};
use crate::utils::error::{InitError, Result};
use crate::utils::timing::PhaseTimer;
use crate::utils::validation::{validate_non_empty_string, Validate};
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub secret_id: String,
    pub init: InitConfig,
}

impl LambdaConfig {
    /// Reads and validates the environment. A failure here is logged the
    /// same way as a failed initialization.
    pub fn load() -> Result<Self> {
        let timer = PhaseTimer::new();
        let result = Self::from_env().and_then(|config| {
            config.validate()?;
            Ok(config)
        });

        if let Err(e) = &result {
            log_failure(e);
            timer.log_total();
        }
        result
    }

    pub fn from_env() -> Result<Self> {
        let secret_id = required_var("DB_SECRET_ARN")?;
        let endpoint = required_var("DB_ENDPOINT")?;
        let database = required_var("DB_NAME")?;

        let target = ConnectionTarget::from_endpoint(&endpoint, database)?;
        let sql_dir = env::var("SQL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_sql_dir());

        let mut init = InitConfig::new(target, sql_dir);
        if let Ok(files) = env::var("SQL_FILES") {
            init = init.with_sql_files(parse_file_list(&files));
        }
        if let Ok(delimiter) = env::var("SQL_DELIMITER") {
            init = init.with_delimiter(parse_delimiter("SQL_DELIMITER", &delimiter)?);
        }

        Ok(Self { secret_id, init })
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).map_err(|_| InitError::MissingConfigError {
        field: name.to_string(),
    })
}

/// SQL files ship next to the function code.
fn default_sql_dir() -> PathBuf {
    if let Ok(root) = env::var("LAMBDA_TASK_ROOT") {
        return PathBuf::from(root).join("sql");
    }

    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("sql")))
        .unwrap_or_else(|| PathBuf::from("sql"))
}

impl ConfigProvider for LambdaConfig {
    fn connection_target(&self) -> &ConnectionTarget {
        &self.init.target
    }

    fn sql_files(&self) -> &[String] {
        &self.init.sql_files
    }

    fn delimiter(&self) -> char {
        self.init.delimiter
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("DB_SECRET_ARN", &self.secret_id)?;
        self.init.validate()?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SecretsManagerProvider {
    client: SecretsManagerClient,
    secret_id: String,
}

impl SecretsManagerProvider {
    pub fn new(client: SecretsManagerClient, secret_id: String) -> Self {
        Self { client, secret_id }
    }
}

impl SecretProvider for SecretsManagerProvider {
    async fn fetch_credentials(&self) -> Result<DbCredentials> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(&self.secret_id)
            .send()
            .await
            .map_err(|e| InitError::SecretRetrievalError {
                message: format!("GetSecretValue failed: {}", DisplayErrorContext(&e)),
            })?;

        let secret = output
            .secret_string()
            .ok_or_else(|| InitError::MalformedSecretError {
                message: "secret has no SecretString (binary secrets are not supported)"
                    .to_string(),
            })?;

        DbCredentials::from_secret_string(secret)
    }
}
