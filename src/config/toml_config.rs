use crate::config::{parse_delimiter, InitConfig};
use crate::domain::model::ConnectionTarget;
use crate::utils::error::{InitError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub database: DatabaseSection,
    pub sql: SqlSection,
    pub credentials: Option<CredentialsSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub endpoint: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlSection {
    pub dir: String,
    pub files: Option<Vec<String>>,
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsSection {
    pub file: Option<PathBuf>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(InitError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InitError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DB_PASSWORD})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| InitError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn to_init_config(&self) -> Result<InitConfig> {
        let target = ConnectionTarget::from_endpoint(&self.database.endpoint, &self.database.name)?;
        let mut config = InitConfig::new(target, &self.sql.dir)
            .with_sql_files(self.sql.files.clone().unwrap_or_default());

        if let Some(delimiter) = &self.sql.delimiter {
            config = config.with_delimiter(parse_delimiter("sql.delimiter", delimiter)?);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[database]
endpoint = "db.internal:3307"
name = "app_db"

[sql]
dir = "./sql"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let init = config.to_init_config().unwrap();

        assert_eq!(init.target.host, "db.internal");
        assert_eq!(init.target.port, 3307);
        assert_eq!(init.sql_files, vec!["user.sql", "schema.sql", "data.sql"]);
        assert!(config.credentials.is_none());
        assert!(init.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TOML_TEST_DB_PASSWORD", "from-env");

        let toml_content = r#"
[database]
endpoint = "localhost"
name = "app_db"

[sql]
dir = "./sql"
files = ["schema.sql"]
delimiter = "$"

[credentials]
username = "admin"
password = "${TOML_TEST_DB_PASSWORD}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let credentials = config.credentials.as_ref().unwrap();
        assert_eq!(credentials.password.as_deref(), Some("from-env"));

        let init = config.to_init_config().unwrap();
        assert_eq!(init.sql_files, vec!["schema.sql"]);
        assert_eq!(init.delimiter, '$');

        std::env::remove_var("TOML_TEST_DB_PASSWORD");
    }

    #[test]
    fn test_unset_variable_is_kept() {
        let toml_content = r#"
[database]
endpoint = "localhost"
name = "${TOML_TEST_SURELY_UNSET}"

[sql]
dir = "./sql"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.database.name, "${TOML_TEST_SURELY_UNSET}");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TomlConfig::from_toml_str("[database"),
            Err(InitError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[database]
endpoint = "localhost"
name = "file_db"

[sql]
dir = "/opt/sql"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.database.name, "file_db");
    }
}
