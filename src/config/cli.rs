use crate::core::SecretProvider;
use crate::domain::model::DbCredentials;
use crate::utils::error::{InitError, Result};
use std::path::PathBuf;

/// Credentials for local runs, read from a JSON file shaped like the
/// deployed secret or given directly.
#[derive(Debug, Clone)]
pub enum LocalSecretProvider {
    File(PathBuf),
    Inline(DbCredentials),
}

impl LocalSecretProvider {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn inline(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Inline(DbCredentials::new(username, password))
    }
}

impl SecretProvider for LocalSecretProvider {
    async fn fetch_credentials(&self) -> Result<DbCredentials> {
        match self {
            LocalSecretProvider::File(path) => {
                tracing::debug!("Reading credentials from {}", path.display());
                let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                    InitError::SecretRetrievalError {
                        message: format!("Cannot read {}: {}", path.display(), e),
                    }
                })?;
                DbCredentials::from_secret_string(&content)
            }
            LocalSecretProvider::Inline(credentials) => Ok(credentials.clone()),
        }
    }
}

#[cfg(feature = "cli")]
pub use args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use super::LocalSecretProvider;
    use crate::config::toml_config::{DatabaseSection, SqlSection, TomlConfig};
    use crate::utils::error::{InitError, Result};
    use crate::utils::validation::validate_required_field;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "db-initializer")]
    #[command(about = "Run the bundled user/schema/data SQL files against a MySQL database")]
    pub struct CliConfig {
        /// Path to TOML configuration file; flags override its values
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Database endpoint as host[:port]
        #[arg(long, env = "DB_ENDPOINT")]
        pub db_endpoint: Option<String>,

        #[arg(long, env = "DB_NAME")]
        pub db_name: Option<String>,

        /// Directory holding the SQL files
        #[arg(long, env = "SQL_DIR")]
        pub sql_dir: Option<String>,

        /// SQL files in execution order
        #[arg(long, value_delimiter = ',')]
        pub sql_files: Vec<String>,

        /// Statement delimiter
        #[arg(long)]
        pub delimiter: Option<String>,

        /// JSON file with username and password keys
        #[arg(long)]
        pub credentials_file: Option<PathBuf>,

        #[arg(long, env = "DB_USERNAME")]
        pub db_username: Option<String>,

        #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
        pub db_password: Option<String>,

        /// Read and split the SQL files without connecting
        #[arg(long)]
        pub dry_run: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        /// Loads the optional TOML file and applies the command line flags
        /// on top of it.
        pub fn load(&self) -> Result<TomlConfig> {
            let mut merged = match &self.config {
                Some(path) => {
                    tracing::info!("📁 Loading configuration from: {}", path.display());
                    TomlConfig::from_file(path)?
                }
                None => TomlConfig {
                    database: DatabaseSection {
                        endpoint: validate_required_field("db_endpoint", &self.db_endpoint)?
                            .clone(),
                        name: validate_required_field("db_name", &self.db_name)?.clone(),
                    },
                    sql: SqlSection {
                        dir: "./sql".to_string(),
                        files: None,
                        delimiter: None,
                    },
                    credentials: None,
                },
            };

            if let Some(endpoint) = &self.db_endpoint {
                merged.database.endpoint = endpoint.clone();
            }
            if let Some(name) = &self.db_name {
                merged.database.name = name.clone();
            }
            if let Some(dir) = &self.sql_dir {
                merged.sql.dir = dir.clone();
            }
            if !self.sql_files.is_empty() {
                merged.sql.files = Some(self.sql_files.clone());
            }
            if let Some(delimiter) = &self.delimiter {
                merged.sql.delimiter = Some(delimiter.clone());
            }

            Ok(merged)
        }

        /// Picks the credentials source. Only needed when the database is
        /// actually contacted.
        pub fn secret_provider(&self, merged: &TomlConfig) -> Result<LocalSecretProvider> {
            if let Some(path) = &self.credentials_file {
                return Ok(LocalSecretProvider::from_file(path));
            }
            if let (Some(username), Some(password)) = (&self.db_username, &self.db_password) {
                return Ok(LocalSecretProvider::inline(username, password));
            }

            let section = merged.credentials.as_ref();
            if let Some(path) = section.and_then(|c| c.file.as_ref()) {
                return Ok(LocalSecretProvider::from_file(path));
            }
            if let Some((username, password)) = section
                .and_then(|c| c.username.as_ref().zip(c.password.as_ref()))
            {
                return Ok(LocalSecretProvider::inline(username, password));
            }

            Err(InitError::MissingConfigError {
                field: "credentials (--credentials-file or --db-username/--db-password)"
                    .to_string(),
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Write;
        use tempfile::NamedTempFile;

        fn parse(args: &[&str]) -> CliConfig {
            let mut argv = vec!["db-initializer"];
            argv.extend_from_slice(args);
            CliConfig::try_parse_from(argv).unwrap()
        }

        fn bare() -> CliConfig {
            CliConfig {
                config: None,
                db_endpoint: None,
                db_name: None,
                sql_dir: None,
                sql_files: vec![],
                delimiter: None,
                credentials_file: None,
                db_username: None,
                db_password: None,
                dry_run: false,
                verbose: false,
            }
        }

        #[test]
        fn test_load_from_flags() {
            let cli = parse(&[
                "--db-endpoint",
                "localhost:3307",
                "--db-name",
                "app_db",
                "--sql-dir",
                "/tmp/sql",
                "--sql-files",
                "schema.sql,data.sql",
                "--db-username",
                "admin",
                "--db-password",
                "pw",
            ]);

            let merged = cli.load().unwrap();
            let init = merged.to_init_config().unwrap();
            assert_eq!(init.target.port, 3307);
            assert_eq!(init.sql_dir, PathBuf::from("/tmp/sql"));
            assert_eq!(init.sql_files, vec!["schema.sql", "data.sql"]);

            let secrets = cli.secret_provider(&merged).unwrap();
            assert!(matches!(secrets, LocalSecretProvider::Inline(_)));
        }

        #[test]
        fn test_flags_override_toml_file() {
            let mut file = NamedTempFile::new().unwrap();
            file.write_all(
                br#"
[database]
endpoint = "db.internal"
name = "from_file"

[sql]
dir = "/opt/sql"
delimiter = "$"

[credentials]
file = "/etc/db-secret.json"
"#,
            )
            .unwrap();

            let cli = CliConfig {
                config: Some(file.path().to_path_buf()),
                db_name: Some("from_flag".to_string()),
                ..bare()
            };

            let merged = cli.load().unwrap();
            let init = merged.to_init_config().unwrap();
            assert_eq!(init.target.host, "db.internal");
            assert_eq!(init.target.database, "from_flag");
            assert_eq!(init.sql_dir, PathBuf::from("/opt/sql"));
            assert_eq!(init.delimiter, '$');

            let secrets = cli.secret_provider(&merged).unwrap();
            assert!(matches!(secrets, LocalSecretProvider::File(_)));
        }

        #[test]
        fn test_missing_endpoint() {
            let cli = CliConfig {
                db_name: Some("app_db".to_string()),
                credentials_file: Some(PathBuf::from("secret.json")),
                ..bare()
            };

            assert!(matches!(
                cli.load(),
                Err(InitError::MissingConfigError { .. })
            ));
        }

        #[test]
        fn test_load_does_not_need_credentials() {
            let cli = CliConfig {
                db_endpoint: Some("localhost".to_string()),
                db_name: Some("app_db".to_string()),
                dry_run: true,
                ..bare()
            };

            let merged = cli.load().unwrap();
            assert!(merged.to_init_config().is_ok());
            assert!(matches!(
                cli.secret_provider(&merged),
                Err(InitError::MissingConfigError { .. })
            ));
        }

        #[test]
        fn test_password_without_username() {
            let cli = CliConfig {
                db_endpoint: Some("localhost".to_string()),
                db_name: Some("app_db".to_string()),
                db_password: Some("pw".to_string()),
                ..bare()
            };

            let merged = cli.load().unwrap();
            assert!(cli.secret_provider(&merged).is_err());
        }
    }
}
