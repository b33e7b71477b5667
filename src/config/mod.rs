pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::{ConnectionTarget, DEFAULT_DELIMITER, DEFAULT_SQL_FILES};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::PathBuf;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

/// Resolved settings shared by every entry point.
#[derive(Debug, Clone)]
pub struct InitConfig {
    pub target: ConnectionTarget,
    pub sql_dir: PathBuf,
    pub sql_files: Vec<String>,
    pub delimiter: char,
}

impl InitConfig {
    pub fn new(target: ConnectionTarget, sql_dir: impl Into<PathBuf>) -> Self {
        Self {
            target,
            sql_dir: sql_dir.into(),
            sql_files: default_sql_files(),
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_sql_files(mut self, files: Vec<String>) -> Self {
        if !files.is_empty() {
            self.sql_files = files;
        }
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

pub fn default_sql_files() -> Vec<String> {
    DEFAULT_SQL_FILES.iter().map(|f| f.to_string()).collect()
}

/// Parses a comma separated file list, ignoring blank entries.
pub fn parse_file_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_delimiter(field_name: &str, value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(crate::utils::error::InitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Delimiter must be exactly one character".to_string(),
        }),
    }
}

impl ConfigProvider for InitConfig {
    fn connection_target(&self) -> &ConnectionTarget {
        &self.target
    }

    fn sql_files(&self) -> &[String] {
        &self.sql_files
    }

    fn delimiter(&self) -> char {
        self.delimiter
    }
}

impl Validate for InitConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("db_endpoint", &self.target.host)?;
        validation::validate_range("db_port", self.target.port, 1, u16::MAX)?;
        validation::validate_database_name("db_name", &self.target.database)?;

        let sql_dir = self.sql_dir.to_string_lossy();
        validation::validate_path("sql_dir", &sql_dir)?;

        validation::validate_bare_file_names("sql_files", &self.sql_files)?;
        validation::validate_file_extensions("sql_files", &self.sql_files, &["sql"])?;
        validation::validate_delimiter("delimiter", self.delimiter)?;

        tracing::debug!("✅ Initializer configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InitConfig {
        let target = ConnectionTarget::from_endpoint("localhost:3306", "app_db").unwrap();
        InitConfig::new(target, "./sql")
    }

    #[test]
    fn test_defaults() {
        let config = sample();
        assert_eq!(config.sql_files, vec!["user.sql", "schema.sql", "data.sql"]);
        assert_eq!(config.delimiter, ';');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_override_keeps_defaults() {
        let config = sample().with_sql_files(vec![]);
        assert_eq!(config.sql_files.len(), 3);
    }

    #[test]
    fn test_rejects_non_sql_file() {
        let config = sample().with_sql_files(vec!["data.txt".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_accepts_hyphenated_database_name() {
        let target = ConnectionTarget::from_endpoint("localhost:3306", "spring-petclinic").unwrap();
        let config = InitConfig::new(target, "./sql");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_file_list() {
        assert_eq!(
            parse_file_list(" user.sql, ,schema.sql,"),
            vec!["user.sql", "schema.sql"]
        );
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter("delimiter", ";").unwrap(), ';');
        assert!(parse_delimiter("delimiter", "").is_err());
        assert!(parse_delimiter("delimiter", ";;").is_err());
    }
}
