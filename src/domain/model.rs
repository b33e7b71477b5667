use crate::utils::error::{InitError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_DELIMITER: char = ';';
pub const DEFAULT_SQL_FILES: [&str; 3] = ["user.sql", "schema.sql", "data.sql"];
pub const SUCCESS_MESSAGE: &str = "Database initialization complete";

/// Credentials stored in the secret's `SecretString`.
///
/// Extra keys written by RDS-managed secrets (`engine`, `host`, `port`,
/// `dbname`, ...) are ignored.
#[derive(Clone, Deserialize)]
pub struct DbCredentials {
    pub username: String,
    pub password: String,
}

impl DbCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_secret_string(secret: &str) -> Result<Self> {
        let credentials: DbCredentials =
            serde_json::from_str(secret).map_err(|e| InitError::MalformedSecretError {
                message: format!("secret is not a credentials object: {}", e),
            })?;

        if credentials.username.trim().is_empty() {
            return Err(InitError::MalformedSecretError {
                message: "username is empty".to_string(),
            });
        }

        Ok(credentials)
    }
}

impl fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl ConnectionTarget {
    /// Parses `host[:port]`, as exposed by RDS cluster endpoints.
    pub fn from_endpoint(endpoint: &str, database: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.trim();
        let (host, port) = match endpoint.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|e| InitError::InvalidConfigValueError {
                        field: "db_endpoint".to_string(),
                        value: endpoint.to_string(),
                        reason: format!("Invalid port: {}", e),
                    })?;
                (host, port)
            }
            None => (endpoint, DEFAULT_MYSQL_PORT),
        };

        if host.is_empty() {
            return Err(InitError::InvalidConfigValueError {
                field: "db_endpoint".to_string(),
                value: endpoint.to_string(),
                reason: "Host cannot be empty".to_string(),
            });
        }

        Ok(Self {
            host: host.to_string(),
            port,
            database: database.into(),
        })
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
    }
}

#[derive(Debug, Clone)]
pub struct SqlBatch {
    pub name: String,
    pub contents: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub name: String,
    pub statements: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    pub batches: Vec<BatchReport>,
    pub secret_elapsed: Duration,
    pub init_elapsed: Duration,
    pub total_elapsed: Duration,
    pub completed_at: DateTime<Utc>,
}

impl InitReport {
    pub fn statements_executed(&self) -> usize {
        self.batches.iter().map(|b| b.statements).sum()
    }
}

/// Payload handed back to the invoking platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InitResponse {
    pub fn success() -> Self {
        Self {
            status_code: 200,
            // body 本身是 JSON 編碼後的字串
            body: serde_json::Value::String(SUCCESS_MESSAGE.to_string()).to_string(),
        }
    }
}

impl From<&InitReport> for InitResponse {
    fn from(_report: &InitReport) -> Self {
        Self::success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_ignore_extra_keys() {
        let secret = r#"{"username":"admin","password":"s3cr3t","engine":"mysql","port":3306}"#;
        let credentials = DbCredentials::from_secret_string(secret).unwrap();
        assert_eq!(credentials.username, "admin");
        assert_eq!(credentials.password, "s3cr3t");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = DbCredentials::new("admin", "s3cr3t");
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("admin"));
        assert!(!printed.contains("s3cr3t"));
    }

    #[test]
    fn test_credentials_missing_password() {
        let result = DbCredentials::from_secret_string(r#"{"username":"admin"}"#);
        assert!(matches!(result, Err(InitError::MalformedSecretError { .. })));
    }

    #[test]
    fn test_credentials_empty_username() {
        let result = DbCredentials::from_secret_string(r#"{"username":" ","password":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_target_with_port() {
        let target =
            ConnectionTarget::from_endpoint("db.cluster.rds.amazonaws.com:3307", "app").unwrap();
        assert_eq!(target.host, "db.cluster.rds.amazonaws.com");
        assert_eq!(target.port, 3307);
        assert_eq!(target.database, "app");
    }

    #[test]
    fn test_target_default_port() {
        let target = ConnectionTarget::from_endpoint("localhost", "app").unwrap();
        assert_eq!(target.port, DEFAULT_MYSQL_PORT);
        assert_eq!(target.to_string(), "localhost:3306/app");
    }

    #[test]
    fn test_target_rejects_bad_endpoint() {
        assert!(ConnectionTarget::from_endpoint(":3306", "app").is_err());
        assert!(ConnectionTarget::from_endpoint("host:notaport", "app").is_err());
    }

    #[test]
    fn test_success_response_shape() {
        let response = InitResponse::success();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], "\"Database initialization complete\"");
    }
}
